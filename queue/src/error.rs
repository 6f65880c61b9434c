// src/error.rs

//! Error types returned by queue construction and operations.

use core::fmt;

// Implements `into_inner`, `Display` and `Error` for errors that hand the rejected item back.
macro_rules! impl_error_for_enum_with_inner {
    (
        $enum_name:ident < $generic_param:ident >, // e.g., OfferError<T>
        $($variant:ident ( $message:expr ) ),+ // e.g., Cancelled("message")
        $(,)?
    ) => {
        impl<$generic_param> $enum_name<$generic_param> {
            /// Consumes the error, returning the item that could not be inserted.
            #[inline]
            pub fn into_inner(self) -> $generic_param {
                match self {
                    $( $enum_name::$variant(v) => v, )+
                }
            }
        }

        impl<$generic_param> fmt::Display for $enum_name<$generic_param> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $( $enum_name::$variant(_) => f.write_str($message), )+
                }
            }
        }

        impl<$generic_param: fmt::Debug> std::error::Error for $enum_name<$generic_param> {}
    };
}

/// Error returned when a queue is constructed with a capacity of zero.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct InvalidCapacity;
impl std::error::Error for InvalidCapacity {}
impl fmt::Display for InvalidCapacity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "queue capacity must be greater than zero")
  }
}

/// A blocking operation (or an interruptible sleep) was aborted by its
/// [`CancelToken`](crate::CancelToken). The queue is left untouched.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Cancelled;
impl std::error::Error for Cancelled {}
impl fmt::Display for Cancelled {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "operation cancelled")
  }
}

/// Error returned by [`offer`](crate::BoundedBlockingQueue::offer) when the
/// caller was cancelled while waiting for room. The item is returned.
#[derive(PartialEq, Eq, Clone)]
pub enum OfferError<T> {
  /// The wait for a free slot was cancelled; nothing was inserted.
  Cancelled(T),
}

impl<T> fmt::Debug for OfferError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OfferError::Cancelled(_) => write!(f, "OfferError::Cancelled(..)"),
    }
  }
}

impl_error_for_enum_with_inner!(OfferError<T>, Cancelled("offer cancelled while waiting for room"));

/// Error returned by [`try_offer`](crate::BoundedBlockingQueue::try_offer) when
/// the item could not be inserted immediately. The item is returned.
#[derive(PartialEq, Eq, Clone)]
pub enum TryOfferError<T> {
  /// The queue is at capacity.
  Full(T),
}

impl<T> fmt::Debug for TryOfferError<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TryOfferError::Full(_) => write!(f, "TryOfferError::Full(..)"),
    }
  }
}

impl_error_for_enum_with_inner!(TryOfferError<T>, Full("queue full"));

/// Error returned by `try_poll` and `try_peek` when no item is available.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum TryPollError {
  /// The queue holds no items.
  Empty,
}
impl std::error::Error for TryPollError {}
impl fmt::Display for TryPollError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TryPollError::Empty => write!(f, "queue empty"),
    }
  }
}
