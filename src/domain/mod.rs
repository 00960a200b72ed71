pub mod board;
pub mod card;
pub mod sorting;

pub use board::{Board, BoardConfig, Column};
pub use card::{Attachment, AttachmentKind, Card, CardId, Comment, Evidence, NewCard, Priority};
pub use sorting::{order_cards, order_cards_in_year, SortMode};
