mod collection_test;
mod derive_test;
mod remove_test;
mod update_test;
