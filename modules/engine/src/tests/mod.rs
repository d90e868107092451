mod test_permission;
mod test_policy;
