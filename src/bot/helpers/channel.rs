use std::time::Duration;

use serenity::all::{
    CommandInteraction, Context, CreateEmbed, CreateInteractionResponse,
    CreateInteractionResponseMessage, EditInteractionResponse, Message, ReactionType,
};

use crate::bot::helpers::pagination::{PageChannel, PageEmbed, PaginatorError};

/// Paginates inside the response to a slash command.
pub struct InteractionChannel<'a> {
    context: &'a Context,
    interaction: &'a CommandInteraction,
    message: Option<Message>,
    timeout: Duration,
}

impl<'a> InteractionChannel<'a> {
    pub fn new(context: &'a Context, interaction: &'a CommandInteraction, timeout: Duration) -> Self {
        InteractionChannel {
            context,
            interaction,
            message: None,
            timeout,
        }
    }

    fn message(&self) -> Result<&Message, PaginatorError> {
        self.message
            .as_ref()
            .ok_or(PaginatorError::Discord(serenity::Error::Other(
                "Paginator message has not been sent yet",
            )))
    }
}

#[serenity::async_trait]
impl PageChannel for InteractionChannel<'_> {
    async fn send(&mut self, content: &str) -> Result<(), PaginatorError> {
        let response = CreateInteractionResponseMessage::new().content(content);

        self.interaction
            .create_response(&self.context.http, CreateInteractionResponse::Message(response))
            .await?;

        self.message = Some(self.interaction.get_response(&self.context.http).await?);
        Ok(())
    }

    async fn edit(
        &mut self,
        content: Option<&str>,
        embed: Option<&PageEmbed>,
    ) -> Result<(), PaginatorError> {
        let edit = EditInteractionResponse::new().content(content.unwrap_or_default());
        let edit = match embed {
            Some(embed) => edit.embed(CreateEmbed::from(embed)),
            None => edit.embeds(Vec::new()),
        };

        let message = self
            .interaction
            .edit_response(&self.context.http, edit)
            .await?;
        self.message = Some(message);
        Ok(())
    }

    async fn add_reaction(&mut self, emoji: &str) -> Result<(), PaginatorError> {
        self.message()?
            .react(self.context, ReactionType::Unicode(emoji.to_string()))
            .await?;
        Ok(())
    }

    async fn next_reaction(&mut self) -> Result<Option<String>, PaginatorError> {
        let Some(message) = &self.message else {
            return Ok(None);
        };

        let reaction = message
            .await_reaction(self.context)
            .author_id(self.interaction.user.id)
            .timeout(self.timeout)
            .await;

        let Some(reaction) = reaction else {
            tracing::debug!("[PAGINATOR] Reaction wait timed out on message {}", message.id);
            return Ok(None);
        };

        // lets the user press the same control again
        if let Err(e) = reaction.delete(self.context).await {
            tracing::debug!("[PAGINATOR] Could not remove user reaction: {}", e);
        }

        Ok(Some(reaction.emoji.to_string()))
    }

    async fn clear_reactions(&mut self) -> Result<(), PaginatorError> {
        self.message()?.delete_reactions(self.context).await?;
        Ok(())
    }
}
