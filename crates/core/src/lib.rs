//! Core types and validation for the tour gateway.

pub mod click;
pub mod error;
pub mod inquiry;
pub mod limits;
pub mod tour;
pub mod validate;

pub use click::ClickEvent;
pub use error::{Error, Result};
pub use inquiry::{InquiryPayload, InquiryRecord};
pub use tour::TourDetail;
