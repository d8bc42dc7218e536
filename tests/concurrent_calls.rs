use std::collections::BTreeSet;

use todo_api::application::messages::{CreateRequest, ReadAllRequest, ReadRequest};
use todo_api::application::todo_service::{ToDoService, ToDoServiceImpl};
use todo_api::domain::repository::ToDoStore;
use todo_api::domain::todo::{Timestamp, ToDo};
use todo_api::infrastructure::sqlite_repo::SqliteToDoStore;
use tokio::task::JoinSet;

const CALLS: i64 = 32;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_share_one_store_handle() {
    let store = SqliteToDoStore::connect("sqlite::memory:").await.unwrap();
    store.init().await.unwrap();
    let service = ToDoServiceImpl::new(store);

    let mut calls = JoinSet::new();
    for n in 0..CALLS {
        let service = service.clone();
        calls.spawn(async move {
            let todo = ToDo { id: 0, title: format!("task {n}"), description: String::new(), reminder: Some(Timestamp::new(n, 0)) };
            service.create(CreateRequest { api: "v1".into(), todo }).await
        });
    }

    let mut ids = BTreeSet::new();
    while let Some(joined) = calls.join_next().await {
        ids.insert(joined.unwrap().unwrap().id);
    }
    assert_eq!(ids.len() as i64, CALLS);

    let all = service.read_all(ReadAllRequest::default()).await.unwrap();
    assert_eq!(all.todos.len() as i64, CALLS);
    assert_eq!(all.todos.iter().map(|t| t.id).collect::<BTreeSet<_>>(), ids);

    // concurrent readers see the committed rows
    let mut reads = JoinSet::new();
    for id in ids.iter().copied() {
        let service = service.clone();
        reads.spawn(async move { service.read(ReadRequest { api: String::new(), id }).await });
    }
    while let Some(joined) = reads.join_next().await {
        let read = joined.unwrap().unwrap();
        assert_eq!(read.todo.title, format!("task {}", read.todo.reminder.unwrap().seconds));
    }
}
