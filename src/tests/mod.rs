mod coc_tests;
mod database_tests;
