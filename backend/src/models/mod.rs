//! Domain records shared by the repository, service and HTTP layers.

pub mod booking;
pub mod date_range;
pub mod macros;
pub mod package;
pub mod user;

pub use booking::*;
pub use date_range::*;
pub use package::*;
pub use user::*;

crate::define_id_type!(i64, PackageId);
crate::define_id_type!(i64, UserId);
crate::define_id_type!(i64, BookingId);
