pub mod stored_event;
