pub mod bench;
pub mod captain;
pub mod chips;
pub mod common;
pub mod events;
pub mod fpl;
pub mod live;
pub mod ownership;
pub mod team_value;
pub mod transfers;
