//! # Rollbook Calendar
//!
//! Turns a frequency preset plus the school's term calendar into a concrete,
//! validated set of school days.
//!
//! - [`business_days`]: weekday filtering over date intervals
//! - [`date_range`]: [`DateRange`], bounds plus the school days inside them
//! - [`term_calendar`]: read-only lookup of term boundaries per academic session
//! - [`resolver`]: [`RangeResolver`], one rule per [`Frequency`](rollbook_models::Frequency)
//! - [`clock`]: where "today" comes from
//!
//! Everything here is synchronous and side-effect free. A [`TermCalendar`] can
//! be shared behind an `Arc` by any number of wizards.
//!
//! # Example
//!
//! ```ignore
//! use rollbook_calendar::{RangeResolver, ResolveContext, TermCalendar};
//! use rollbook_models::{Frequency, Term};
//!
//! let calendar = TermCalendar::from_sessions(terms)?;
//! let range = RangeResolver::new(&calendar).resolve(
//!     Frequency::Term,
//!     today,
//!     ResolveContext::for_term("2024/2025", Term::First),
//! )?;
//! println!("{} school days", range.valid_days().len());
//! ```

pub mod business_days;
pub mod clock;
pub mod date_range;
pub mod resolver;
pub mod term_calendar;

pub use business_days::{filter_business_days, is_business_day, nth_business_day};
pub use clock::{Clock, FixedClock, SystemClock};
pub use date_range::DateRange;
pub use resolver::{CustomPick, RangeResolver, ResolveContext, ResolveError};
pub use term_calendar::{CalendarError, LookupError, TermCalendar};
