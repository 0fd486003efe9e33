mod multi_threaded_test;
