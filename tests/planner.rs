mod common;
use chrono::NaiveDate;
use planbook::api::{CurriculumApi, SpecialDay};
use planbook::config::PlannerConfig;
use planbook::model::{Curriculum, CurriculumEntity, NodeKey};
use planbook::model::entity::{AnyEntity, EntityDraft, LessonCreate};
use planbook::planner::{DropOutcome, PlannerError, Toast, ToastLevel};
use planbook::tree::{DragRejection, DropPosition, DropRequest, MoveKind};
use reqwest::StatusCode;

use crate::common::{StubBackend, sample_store};

fn child_keys(cache: &Curriculum, parent: NodeKey) -> Vec<NodeKey> {
    cache
        .children_of(parent)
        .into_iter()
        .map(AnyEntity::key)
        .collect()
}

#[tokio::test]
async fn http_client_reads_a_course() {
    let backend = StubBackend::spawn(sample_store()).await;
    let api = backend.client();

    let courses = api.list_courses().await.unwrap();
    assert_eq!(courses.len(), 2);

    let snapshot = api.load_course(1).await.unwrap();
    assert_eq!(snapshot.course.map(|c| c.key()), Some(NodeKey::course(1)));
    assert_eq!(snapshot.topics.len(), 2);
    assert_eq!(snapshot.sub_topics.len(), 1);
    assert_eq!(snapshot.lessons.len(), 4);

    let missing = api.load_course(99).await.unwrap_err();
    assert_eq!(missing.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(missing.client_display(), "course:99 not found");
}

#[tokio::test]
async fn sort_within_a_topic() {
    let backend = StubBackend::spawn(sample_store()).await;
    let (mut service, toasts) = backend.planner(PlannerConfig::default()).await;

    let outcome = service
        .drop_node(DropRequest::new(
            NodeKey::lesson(30),
            NodeKey::lesson(32),
            DropPosition::After,
        ))
        .await
        .unwrap();

    let DropOutcome::Moved { plan, entity } = outcome else {
        panic!("expected a move");
    };
    assert_eq!(plan.kind, MoveKind::Sort);
    assert_eq!(entity.key(), NodeKey::lesson(30));
    assert_eq!(
        child_keys(service.cache(), NodeKey::topic(10)),
        vec![NodeKey::sub_topic(20), NodeKey::lesson(32), NodeKey::lesson(30)]
    );
    assert_eq!(
        backend.store.children_of(NodeKey::topic(10)),
        child_keys(service.cache(), NodeKey::topic(10))
    );
    assert_eq!(toasts.drain(), vec![Toast::success("Moved \"Variables\"")]);
}

#[tokio::test]
async fn regroup_across_courses_reloads_both() {
    let backend = StubBackend::spawn(sample_store()).await;
    let (mut service, _) = backend.planner(PlannerConfig::default()).await;

    let outcome = service
        .drop_node(DropRequest::new(
            NodeKey::lesson(34),
            NodeKey::topic(10),
            DropPosition::Inside,
        ))
        .await
        .unwrap();

    assert!(matches!(outcome, DropOutcome::Moved { plan, .. } if plan.kind == MoveKind::Regroup));
    let moved = service.cache().get(NodeKey::lesson(34)).unwrap();
    assert_eq!(moved.parent(), Some(NodeKey::topic(10)));
    assert_eq!(moved.course_id(), 1);
    assert_eq!(moved.sort_order(), 3);
    assert!(service.cache().children_of(NodeKey::topic(12)).is_empty());
}

#[tokio::test]
async fn rejected_drop_never_reaches_the_backend() {
    let backend = StubBackend::spawn(sample_store()).await;
    let (mut service, toasts) = backend.planner(PlannerConfig::default()).await;
    let served = backend.served();

    for (source, target, position) in [
        (NodeKey::course(1), NodeKey::course(2), DropPosition::After),
        (NodeKey::topic(10), NodeKey::sub_topic(20), DropPosition::Inside),
        (NodeKey::lesson(30), NodeKey::lesson(30), DropPosition::Before),
        (NodeKey::lesson(32), NodeKey::topic(10), DropPosition::Inside),
        (NodeKey::topic(10), NodeKey::course(2), DropPosition::Before),
    ] {
        let outcome = service
            .drop_node(DropRequest::new(source, target, position))
            .await
            .unwrap();
        assert!(matches!(outcome, DropOutcome::Rejected(_)), "{source} -> {target}");
    }

    assert_eq!(backend.served(), served);
    assert!(toasts.is_empty());
}

#[tokio::test]
async fn backend_refusal_is_reported() {
    let backend = StubBackend::spawn(sample_store()).await;
    let (mut service, toasts) = backend.planner(PlannerConfig::default()).await;
    backend.store.fail_next(StatusCode::CONFLICT);

    let result = service
        .drop_node(DropRequest::new(
            NodeKey::lesson(32),
            NodeKey::lesson(30),
            DropPosition::Before,
        ))
        .await;

    match result {
        Err(PlannerError::ApiError(e)) => assert_eq!(e.status(), Some(StatusCode::CONFLICT)),
        other => panic!("unexpected result {other:?}"),
    }
    assert_eq!(service.cache().get(NodeKey::lesson(32)).unwrap().sort_order(), 2);
    assert_eq!(
        toasts.drain(),
        vec![Toast {
            level: ToastLevel::Error,
            message: String::from("409 injected failure"),
        }]
    );
}

#[tokio::test]
async fn unknown_drop_source_is_rejected() {
    let backend = StubBackend::spawn(sample_store()).await;
    let (mut service, _) = backend.planner(PlannerConfig::default()).await;

    let outcome = service
        .drop_node(DropRequest::new(
            NodeKey::lesson(99),
            NodeKey::topic(10),
            DropPosition::Inside,
        ))
        .await
        .unwrap();
    assert_eq!(outcome, DropOutcome::Rejected(DragRejection::UnknownNode(NodeKey::lesson(99))));
}

#[tokio::test]
async fn crud_round_trip() {
    let backend = StubBackend::spawn(sample_store()).await;
    let (mut service, _) = backend.planner(PlannerConfig::default()).await;

    let created = service
        .create(EntityDraft::Lesson(LessonCreate::in_sub_topic(1, 10, 20, "Intercepts")))
        .await
        .unwrap();
    assert_eq!(created.parent(), Some(NodeKey::sub_topic(20)));
    assert_eq!(created.sort_order(), 1);
    assert_eq!(backend.store.get(created.key()), Some(created.clone()));

    let AnyEntity::Lesson(mut lesson) = created else {
        panic!("expected a lesson");
    };
    lesson.set_title("Axis intercepts");
    let updated = service.update(lesson.into()).await.unwrap();
    assert_eq!(updated.title(), "Axis intercepts");

    service.delete(NodeKey::topic(11)).await.unwrap();
    assert!(!service.cache().contains(NodeKey::lesson(33)));
    assert!(backend.store.get(NodeKey::lesson(33)).is_none());
}

#[tokio::test]
async fn copy_lands_at_the_end() {
    let backend = StubBackend::spawn(sample_store()).await;
    let (mut service, _) = backend.planner(PlannerConfig::default()).await;

    let copy = service
        .copy_node(NodeKey::topic(10), NodeKey::course(2))
        .await
        .unwrap();
    assert_eq!(copy.parent(), Some(NodeKey::course(2)));
    assert_eq!(copy.sort_order(), 1);
    assert_eq!(child_keys(service.cache(), copy.key()).len(), 3);
    // the original is untouched
    assert_eq!(child_keys(service.cache(), NodeKey::topic(10)).len(), 3);
}

#[tokio::test]
async fn special_days_are_kept_per_date() {
    let backend = StubBackend::spawn(sample_store()).await;
    let (service, _) = backend.planner(PlannerConfig::default()).await;
    let date = NaiveDate::from_ymd_opt(2026, 12, 24).unwrap();

    service
        .save_special_day(SpecialDay {
            id: None,
            course_id: 1,
            date,
            label: String::from("Winter break"),
            cancels_lessons: true,
        })
        .await
        .unwrap();
    service
        .save_special_day(SpecialDay {
            id: None,
            course_id: 1,
            date,
            label: String::from("Half day"),
            cancels_lessons: false,
        })
        .await
        .unwrap();

    let days = service.special_days(1).await.unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0].label, "Half day");
    assert!(service.special_days(2).await.unwrap().is_empty());
}
