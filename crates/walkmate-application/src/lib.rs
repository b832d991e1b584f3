pub mod session_usecase;
pub mod tracking_usecase;

pub use session_usecase::{SessionUseCase, SessionView};
pub use tracking_usecase::{LiveTrackingUseCase, LiveWalkFeed, PositionPublisher};
