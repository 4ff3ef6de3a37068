mod test_disconnect_cleanup;
mod test_hub_session;
