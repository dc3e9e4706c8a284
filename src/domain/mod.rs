/// Badge catalog and threshold evaluation.
pub mod badges;
/// Typed game aggregate shared between storage and services.
pub mod game;
/// Pure lifecycle transition rules for the game status field.
pub mod lifecycle;
