//! Protocol-layer collaborators.
//!
//! The routing core never parses or writes frames itself. This module holds
//! the small contract the surrounding broker uses around it: the frame model,
//! the receipt-on-request handler and the client-facing fault shape.
//!
//! ```
//! use channel_router::{ClientFault, Command, Frame, RECEIPT_HEADER};
//!
//! let frame = Frame::new(Command::Send).with_header(RECEIPT_HEADER, "r-7");
//! let error = ClientFault::new("unknown destination")
//!     .with_details("queue.missing")
//!     .with_frame(frame)
//!     .to_error_frame();
//!
//! assert_eq!(error.command(), Command::Error);
//! assert_eq!(error.receipt_id(), Some("r-7"));
//! ```

pub(crate) mod client_fault;
pub(crate) mod frame;
pub(crate) mod receipt;
