//! Domain models shared by the storage layer and the managers.

mod friendship;
mod goal;
mod user;

pub use friendship::{Friendship, FriendshipStatus, mirror_key, pair_key, pair_key_of_record};
pub use goal::{Goal, NewGoal};
pub use user::{NewUser, PublicUser, User, new_user_id};
