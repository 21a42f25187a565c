use todobot_core::Action;
use todobot_session::{ConversationState, MemorySessionStore, Session, SessionKey, SessionStore};

#[tokio::test]
async fn test_put_and_get_session() {
    let store = MemorySessionStore::new();
    let key = SessionKey::new(10, 20);
    store.put(&Session::new(key)).await.unwrap();

    let loaded = store.get(key).await.unwrap().unwrap();
    assert_eq!(loaded.key, key);
    assert_eq!(loaded.state(), ConversationState::Choosing);
    assert!(loaded.items.is_empty());
}

#[tokio::test]
async fn test_get_missing_returns_none() {
    let store = MemorySessionStore::new();
    let result = store.get(SessionKey::new(1, 1)).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_put_overwrites_previous_state() {
    let store = MemorySessionStore::new();
    let key = SessionKey::new(1, 1);
    let mut session = Session::new(key);
    store.put(&session).await.unwrap();

    session.choose(Action::Add);
    session.apply_pending("buy milk").unwrap().unwrap();
    session.choose(Action::Toggle);
    store.put(&session).await.unwrap();

    let loaded = store.get(key).await.unwrap().unwrap();
    assert_eq!(loaded.items.items(), ["buy milk"]);
    assert_eq!(loaded.state(), ConversationState::TypingReply);
    assert_eq!(loaded.pending_action(), Some(Action::Toggle));
    assert_eq!(store.session_count().await, 1);
}

#[tokio::test]
async fn test_remove_session() {
    let store = MemorySessionStore::new();
    let key = SessionKey::new(5, 5);
    store.put(&Session::new(key)).await.unwrap();

    let removed = store.remove(key).await.unwrap();
    assert!(removed.is_some());
    assert!(store.get(key).await.unwrap().is_none());
    assert!(store.remove(key).await.unwrap().is_none());
}

#[tokio::test]
async fn test_sessions_are_isolated_per_key() {
    let store = MemorySessionStore::new();
    let alice = SessionKey::new(-100, 1);
    let bob = SessionKey::new(-100, 2);

    let mut a = Session::new(alice);
    a.choose(Action::Add);
    a.apply_pending("alice's task").unwrap().unwrap();
    store.put(&a).await.unwrap();
    store.put(&Session::new(bob)).await.unwrap();

    let b = store.get(bob).await.unwrap().unwrap();
    assert!(b.items.is_empty());
    assert_eq!(store.session_count().await, 2);

    store.remove(bob).await.unwrap();
    let a = store.get(alice).await.unwrap().unwrap();
    assert_eq!(a.items.items(), ["alice's task"]);
}
