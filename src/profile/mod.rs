//! Turning a raw Discord profile into a displayable profile card

pub mod aggregator;
pub mod badges;
pub mod format;
pub mod member;

pub use aggregator::{ProfileAggregator, ProfileCard, TargetUser};
pub use format::CdnUrls;
pub use member::MemberContext;
