mod test_join_unknown_room;
mod test_single_room_policy;
