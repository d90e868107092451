mod test_simulated;
