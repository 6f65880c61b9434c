pub(crate) mod waker_set;
