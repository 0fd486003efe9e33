mod parse_negative_test;
mod search_test;
