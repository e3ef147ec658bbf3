//! Tests for resolving, rendering and sending task notifications.

use std::sync::Arc;

use crate::account::{
    domain::{EmailAddress, User, UserId, Username},
    ports::directory::MockUserDirectory,
};
use crate::tracker::{
    adapters::memory::InMemoryTrackerStore,
    domain::{
        EntityKind, ItemName, NewTask, Project, ProjectId, Status, StatusRank, Task, TaskEdit,
        TaskNotice,
    },
    ports::{
        NotifierError, ProjectRepository, StatusRepository, notifier::MockNotifier,
    },
    services::{
        NotificationError, NotificationSettings, NotificationTemplates, TaskNotificationService,
    },
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestNotifications =
    TaskNotificationService<InMemoryTrackerStore, MockUserDirectory, MockNotifier>;

fn email(value: &str) -> EmailAddress {
    EmailAddress::new(value).expect("valid email")
}

fn person(name: &str, address: Option<&str>) -> User {
    User::new(
        Username::new(name).expect("valid username"),
        address.map(email),
        &DefaultClock,
    )
}

/// Directory mock that resolves exactly the given users.
fn directory_of(users: Vec<User>) -> MockUserDirectory {
    let mut directory = MockUserDirectory::new();
    directory.expect_find_by_id().returning(move |id| {
        Ok(users.iter().find(|user| user.id() == id).cloned())
    });
    directory
}

fn service(
    statuses: Arc<InMemoryTrackerStore>,
    directory: MockUserDirectory,
    notifier: MockNotifier,
    settings: NotificationSettings,
) -> TestNotifications {
    TaskNotificationService::new(statuses, Arc::new(directory), Arc::new(notifier), settings)
}

fn settings() -> NotificationSettings {
    NotificationSettings::new(email("zira@example.com"))
}

/// A task in a two-status workflow, before and after a change.
struct Change {
    store: Arc<InMemoryTrackerStore>,
    before: Task,
    worker: User,
    editor: User,
}

#[fixture]
async fn change() -> Change {
    let store = Arc::new(InMemoryTrackerStore::new());
    let project = Project::new(
        ItemName::new(EntityKind::Project, "Zira").expect("valid name"),
        None,
        None,
        None,
        &DefaultClock,
    );
    store.store_project(&project).await.expect("project stored");
    let open = store_status(&store, project.id(), "Open", 0).await;
    let worker = person("grace", Some("grace@example.com"));
    let before = Task::new(
        NewTask {
            project_id: project.id(),
            name: ItemName::new(EntityKind::Task, "Lexer").expect("valid name"),
            description: None,
            author: None,
            worker: Some(worker.id()),
            sprint_id: None,
            status_id: Some(open.id()),
            finish_by: None,
        },
        &DefaultClock,
    );
    Change {
        store,
        before,
        worker,
        editor: person("ada", Some("ada@example.com")),
    }
}

async fn store_status(
    store: &InMemoryTrackerStore,
    project_id: ProjectId,
    name: &str,
    rank: u32,
) -> Status {
    let status = Status::new(
        project_id,
        ItemName::new(EntityKind::Status, name).expect("valid name"),
        StatusRank::new(rank).expect("valid rank"),
        None,
        &DefaultClock,
    );
    store.store_status(&status).await.expect("status stored");
    status
}

fn notice_for(before: &Task, edit: TaskEdit, editor: Option<UserId>) -> TaskNotice {
    let mut after = before.clone();
    after.apply(edit, editor, &DefaultClock);
    TaskNotice::from_change(before, &after).expect("change produces a notice")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn status_change_renders_both_status_names(#[future(awt)] change: Change) {
    let done = store_status(&change.store, change.before.project_id(), "Done", 1).await;
    let notice = notice_for(
        &change.before,
        TaskEdit::new().with_status(Some(done.id())),
        Some(change.editor.id()),
    );
    let mut notifier = MockNotifier::new();
    notifier
        .expect_send()
        .withf(|message| message.to.as_str() == "grace@example.com")
        .times(1)
        .returning(|_| Ok(()));
    let notifications = service(
        Arc::clone(&change.store),
        directory_of(vec![change.worker.clone(), change.editor.clone()]),
        notifier,
        settings(),
    );

    let message = notifications.deliver(&notice).await.expect("delivered");

    assert_eq!(message.from.as_str(), "zira@example.com");
    assert_eq!(message.subject, "Task status changed");
    assert_eq!(
        message.body,
        "grace, hello! User ada (ada@example.com) changed the status of task \
         'Lexer' from 'Open' to 'Done'. Please take a look."
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn custom_templates_see_every_variable(#[future(awt)] change: Change) {
    let newcomer = person("bob", Some("bob@example.com"));
    let notice = notice_for(
        &change.before,
        TaskEdit::new().with_worker(Some(newcomer.id())),
        Some(change.editor.id()),
    );
    let templates = NotificationTemplates {
        assigned_subject: "[{{ task }}] for {{ recipient }}".to_owned(),
        assigned_body: "{{ editor }}/{{ editor_email }}/{{ old_status }}/{{ new_status }}"
            .to_owned(),
        ..NotificationTemplates::default()
    };
    let mut notifier = MockNotifier::new();
    notifier.expect_send().times(1).returning(|_| Ok(()));
    let notifications = service(
        Arc::clone(&change.store),
        directory_of(vec![newcomer, change.editor.clone()]),
        notifier,
        settings().with_templates(templates),
    );

    let message = notifications.deliver(&notice).await.expect("delivered");

    assert_eq!(message.to.as_str(), "bob@example.com");
    assert_eq!(message.subject, "[Lexer] for bob");
    assert_eq!(message.body, "ada/ada@example.com//");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn editor_without_email_renders_blank_address(#[future(awt)] change: Change) {
    let quiet = person("quiet", None);
    let notice = notice_for(
        &change.before,
        TaskEdit::new().with_status(None),
        Some(quiet.id()),
    );
    let mut notifier = MockNotifier::new();
    notifier.expect_send().times(1).returning(|_| Ok(()));
    let notifications = service(
        Arc::clone(&change.store),
        directory_of(vec![change.worker.clone(), quiet]),
        notifier,
        settings(),
    );

    let message = notifications.deliver(&notice).await.expect("delivered");

    assert!(message.body.contains("User quiet () changed"));
    assert!(message.body.contains("from 'Open' to 'none'"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn recipient_without_email_is_skipped(#[future(awt)] change: Change) {
    let silent = person("silent", None);
    let notice = notice_for(
        &change.before,
        TaskEdit::new().with_worker(Some(silent.id())),
        Some(change.editor.id()),
    );
    let mut notifier = MockNotifier::new();
    notifier.expect_send().never();
    let notifications = service(
        Arc::clone(&change.store),
        directory_of(vec![silent, change.editor.clone()]),
        notifier,
        settings(),
    );

    let err = notifications
        .deliver(&notice)
        .await
        .expect_err("no address to send to");

    assert!(matches!(err, NotificationError::MissingEmail(name) if name.as_str() == "silent"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_editor_is_reported(#[future(awt)] change: Change) {
    let stranger = UserId::new();
    let notice = notice_for(
        &change.before,
        TaskEdit::new().with_status(None),
        Some(stranger),
    );
    let mut notifier = MockNotifier::new();
    notifier.expect_send().never();
    let notifications = service(
        Arc::clone(&change.store),
        directory_of(vec![change.worker.clone()]),
        notifier,
        settings(),
    );

    let err = notifications
        .deliver(&notice)
        .await
        .expect_err("editor cannot be resolved");

    assert!(matches!(err, NotificationError::UnknownUser(id) if id == stranger));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn change_without_editor_is_reported(#[future(awt)] change: Change) {
    let notice = notice_for(&change.before, TaskEdit::new().with_status(None), None);
    let mut notifier = MockNotifier::new();
    notifier.expect_send().never();
    let notifications = service(
        Arc::clone(&change.store),
        directory_of(vec![change.worker.clone()]),
        notifier,
        settings(),
    );

    let err = notifications
        .deliver(&notice)
        .await
        .expect_err("no acting user");

    assert!(matches!(err, NotificationError::NoEditor(id) if id == change.before.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn broken_template_is_a_render_error(#[future(awt)] change: Change) {
    let notice = notice_for(
        &change.before,
        TaskEdit::new().with_status(None),
        Some(change.editor.id()),
    );
    let templates = NotificationTemplates {
        status_changed_subject: "{{ task ".to_owned(),
        ..NotificationTemplates::default()
    };
    let mut notifier = MockNotifier::new();
    notifier.expect_send().never();
    let notifications = service(
        Arc::clone(&change.store),
        directory_of(vec![change.worker.clone(), change.editor.clone()]),
        notifier,
        settings().with_templates(templates),
    );

    let err = notifications
        .deliver(&notice)
        .await
        .expect_err("template does not parse");

    assert!(matches!(err, NotificationError::Render(_)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_delivery_is_reported(#[future(awt)] change: Change) {
    let notice = notice_for(
        &change.before,
        TaskEdit::new().with_status(None),
        Some(change.editor.id()),
    );
    let mut notifier = MockNotifier::new();
    notifier.expect_send().times(1).returning(|message| {
        Err(NotifierError::Rejected {
            recipient: message.to.clone(),
            reason: "mailbox full".to_owned(),
        })
    });
    let notifications = service(
        Arc::clone(&change.store),
        directory_of(vec![change.worker.clone(), change.editor.clone()]),
        notifier,
        settings(),
    );

    let err = notifications
        .deliver(&notice)
        .await
        .expect_err("notifier rejects");

    assert!(matches!(err, NotificationError::Delivery(_)));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn disabled_settings_send_nothing(#[future(awt)] change: Change) {
    let notice = notice_for(
        &change.before,
        TaskEdit::new().with_status(None),
        Some(change.editor.id()),
    );
    let mut directory = MockUserDirectory::new();
    directory.expect_find_by_id().never();
    let mut notifier = MockNotifier::new();
    notifier.expect_send().never();
    let notifications = service(
        Arc::clone(&change.store),
        directory,
        notifier,
        settings().with_enabled(false),
    );

    notifications.dispatch(&notice).await;
}
