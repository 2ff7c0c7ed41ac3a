pub mod swipe;
pub mod user;

pub use swipe::Entity as SwipeEntity;
pub use user::Entity as UserEntity;
