//! End-to-end walk lifecycle: matching, live tracking, completion.

use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use walkmate_application::{LiveTrackingUseCase, SessionUseCase};
use walkmate_core::config::TrackingSettings;
use walkmate_core::profile::{PetProfile, UserProfile};
use walkmate_core::session::{MatchingEngine, SessionKind, SessionStatus, WalkSchedule};
use walkmate_core::tracking::PresenceBus;
use walkmate_infrastructure::{
    InMemoryPetRepository, InMemoryProfileRepository, InMemorySessionRepository,
};

struct World {
    engine: MatchingEngine,
    sessions_usecase: SessionUseCase,
    tracking: LiveTrackingUseCase,
}

fn world() -> World {
    let sessions = Arc::new(InMemorySessionRepository::new());
    let pets = Arc::new(InMemoryPetRepository::with_pets(vec![PetProfile {
        id: "pet-biscuit".to_string(),
        owner_id: "owner-ada".to_string(),
        name: "Biscuit".to_string(),
        breed: Some("corgi".to_string()),
    }]));
    let profiles = Arc::new(InMemoryProfileRepository::with_profiles(vec![
        UserProfile {
            id: "owner-ada".to_string(),
            display_name: "Ada".to_string(),
        },
        UserProfile {
            id: "walker-grace".to_string(),
            display_name: "Grace".to_string(),
        },
    ]));
    let bus = Arc::new(PresenceBus::new(32));

    World {
        engine: MatchingEngine::new(sessions.clone(), pets.clone()),
        sessions_usecase: SessionUseCase::new(sessions.clone(), pets, profiles),
        tracking: LiveTrackingUseCase::new(
            sessions,
            bus,
            TrackingSettings {
                publish_debounce_ms: 0,
                ..Default::default()
            },
        ),
    }
}

fn schedule() -> WalkSchedule {
    WalkSchedule {
        starts_at: Utc::now(),
        duration_minutes: 45,
    }
}

#[tokio::test]
async fn test_full_walk_lifecycle() {
    let world = world();

    // Owner publishes a scheduled walk; two walkers apply.
    let session = world
        .engine
        .create_session(
            "owner-ada",
            "pet-biscuit",
            SessionKind::Scheduled,
            schedule(),
            2500,
        )
        .await
        .unwrap();
    world.engine.apply(&session.id, "walker-grace").await.unwrap();
    world.engine.apply(&session.id, "walker-bob").await.unwrap();

    // Tracking is refused while the session is still pending.
    let err = world
        .tracking
        .open_feed(&session.id, "owner-ada", "Ada")
        .await
        .unwrap_err();
    assert!(err.is_invalid_state());

    // Owner picks Grace; the walk starts.
    world
        .engine
        .accept_applicant(&session.id, "owner-ada", "walker-grace")
        .await
        .unwrap();
    world
        .engine
        .advance_to_in_progress(&session.id, "walker-grace")
        .await
        .unwrap();

    // Both participants open live feeds and exchange positions.
    let owner_feed = world
        .tracking
        .open_feed(&session.id, "owner-ada", "Ada")
        .await
        .unwrap();
    let walker_feed = world
        .tracking
        .open_feed(&session.id, "walker-grace", "Grace")
        .await
        .unwrap();
    assert_eq!(owner_feed.grant().counterpart_id, "walker-grace");
    assert_eq!(walker_feed.grant().counterpart_id, "owner-ada");
    assert_eq!(owner_feed.grant().topic, walker_feed.grant().topic);

    assert!(owner_feed.publisher().publish(52.5200, 13.4050).await);
    assert!(walker_feed.publisher().publish(52.5205, 13.4049).await);

    for _ in 0..100 {
        if owner_feed.counterpart_position().await.is_some()
            && walker_feed.counterpart_position().await.is_some()
        {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let walker_pos = owner_feed.counterpart_position().await.unwrap();
    assert_eq!(walker_pos.display_name, "Grace");
    assert_eq!(walker_pos.latitude, 52.5205);
    let owner_pos = walker_feed.counterpart_position().await.unwrap();
    assert_eq!(owner_pos.display_name, "Ada");

    // The walk ends; the session is terminal and tracking refuses re-entry.
    let completed = world
        .engine
        .complete_session(&session.id, "owner-ada")
        .await
        .unwrap();
    assert_eq!(completed.status, SessionStatus::Completed);
    assert!(completed.ended_at.is_some());

    owner_feed.close();
    walker_feed.close();

    let err = world
        .tracking
        .open_feed(&session.id, "walker-grace", "Grace")
        .await
        .unwrap_err();
    assert!(err.is_invalid_state());

    // The completed walk still shows up for both parties, enriched.
    let view = world.sessions_usecase.session_view(&session.id).await.unwrap();
    assert_eq!(view.pet_name, "Biscuit");
    assert_eq!(view.owner_name, "Ada");
    assert_eq!(view.walker_name.as_deref(), Some("Grace"));

    let walker_sessions = world
        .sessions_usecase
        .list_for_walker("walker-grace")
        .await
        .unwrap();
    assert_eq!(walker_sessions.len(), 1);
}

#[tokio::test]
async fn test_broadcast_walk_is_first_come_first_served() {
    let world = world();

    let session = world
        .engine
        .create_session(
            "owner-ada",
            "pet-biscuit",
            SessionKind::Broadcast,
            schedule(),
            1800,
        )
        .await
        .unwrap();

    let accepted = world.engine.apply(&session.id, "walker-grace").await.unwrap();
    assert_eq!(accepted.status, SessionStatus::Accepted);
    assert_eq!(accepted.walker_id.as_deref(), Some("walker-grace"));

    // The session left the open listing the moment it was matched.
    let open = world.sessions_usecase.list_open_sessions().await.unwrap();
    assert!(open.is_empty());

    // A second walker is told the walk is no longer available.
    let err = world.engine.apply(&session.id, "walker-bob").await.unwrap_err();
    assert!(err.is_invalid_state());

    // Both sides may track as soon as the match is made.
    let feed = world
        .tracking
        .open_feed(&session.id, "walker-grace", "Grace")
        .await
        .unwrap();
    assert_eq!(feed.grant().counterpart_id, "owner-ada");
}
