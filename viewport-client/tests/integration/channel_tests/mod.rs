mod test_bad_endpoint;
