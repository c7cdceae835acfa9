//! The seven interaction kinds, each a [`StateMachine`](crate::StateMachine).

pub mod bottom_sheet;
pub mod carousel;
pub mod entrance;
pub mod expandable;
pub mod flip_card;
pub mod quiz;
pub mod tabs;

pub use bottom_sheet::{BottomSheet, SheetState};
pub use carousel::{Carousel, CarouselState};
pub use entrance::{Entrance, EntranceState};
pub use expandable::{ExpandState, Expandable};
pub use flip_card::{FlipCard, FlipState};
pub use quiz::{Quiz, QuizState};
pub use tabs::{Tabs, TabsState};
