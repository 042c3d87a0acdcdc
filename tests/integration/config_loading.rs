//! Hub document loading: root and named server sections, environment overrides

use super::test_utils::{with_env, CourseTree};
use coursehub::config::{ConfigLoader, ServerMode};
use coursehub::engine::HubEngine;
use coursehub::types::{OfferingKey, Role, Selection};
use std::fs;

const HUB_DOCUMENT: &str = r#"
spawn:
  student_uid: 1500
  batch_username_pattern: "^ta-"
logging:
  level: warn
server:
  teaching:
    mode: teaching
    commands:
      - echo teaching
    nbgrader:
      course_dir: COURSE_ROOT
      default_exchange:
        - echo exchange ready
    extra_mounts:
      enabled: true
      volume_mounts:
        datasets:
          name: disk4
          mountPath: /srv/datasets
          subPath: datasets
  exam:
    mode: exam
    nbgrader:
      enabled: false
    exam_kernel:
      allowed_imports: [math, numpy]
"#;

fn write_document(tree: &CourseTree) -> std::path::PathBuf {
    let path = tree.path().join("hub.yaml");
    let document = HUB_DOCUMENT.replace("COURSE_ROOT", &tree.root().to_string_lossy());
    fs::write(&path, document).unwrap();
    path
}

#[test]
fn test_named_sections_share_spawn_settings() {
    let tree = CourseTree::new();
    let path = write_document(&tree);

    let (teaching, exam) = with_env(&[], || {
        (
            ConfigLoader::load_from_file(&path, Some("teaching")).unwrap(),
            ConfigLoader::load_from_file(&path, Some("exam")).unwrap(),
        )
    });

    assert_eq!(teaching.spawn.student_uid, 1500);
    assert_eq!(exam.spawn.student_uid, 1500);
    assert_eq!(teaching.logging.level, "warn");

    assert_eq!(teaching.server.mode(), ServerMode::Teaching);
    assert_eq!(teaching.server.commands, vec!["echo teaching".to_string()]);
    assert!(teaching.server.nbgrader_enabled());
    assert_eq!(
        teaching.server.default_exchange().unwrap().commands,
        vec!["echo exchange ready".to_string()]
    );
    let mounts = teaching.server.extra_mounts();
    assert_eq!(mounts.len(), 1);
    assert_eq!(mounts[0].mount_path, "/srv/datasets");

    assert_eq!(exam.server.mode(), ServerMode::Exam);
    assert!(!exam.server.nbgrader_enabled());
    assert!(exam.server.extra_mounts().is_empty());
    assert_eq!(
        exam.server.exam_kernel.as_ref().unwrap().allowed_imports,
        Some(vec!["math".to_string(), "numpy".to_string()])
    );
}

#[test]
fn test_loaded_document_drives_the_engine() {
    let tree = CourseTree::new();
    tree.offering("CS101", "graders", "CS101-WS24", "mount_prev_courses: false\n", Some(&["ta-anna"]));
    let path = write_document(&tree);

    let config = with_env(&[], || ConfigLoader::load_from_file(&path, Some("teaching")).unwrap());
    let engine = HubEngine::new(config);

    let plan = engine
        .plan_spawn(
            "ta-anna",
            &Selection::Offering(OfferingKey::new("CS101", Role::Grader, "CS101-WS24")),
        )
        .unwrap();
    assert_eq!(plan.mounts[1].mount_path, "/home/jovyan/courses/CS101/CS101-WS24");
    assert!(plan
        .lifecycle_hooks
        .post_start_script()
        .contains("echo exchange ready"));
    assert_eq!(plan.mounts.last().unwrap().mount_path, "/srv/datasets");
}

#[test]
fn test_environment_overrides_document() {
    let tree = CourseTree::new();
    let path = write_document(&tree);

    let config = with_env(
        &[
            ("COURSEHUB__SPAWN__GRADER_UID", "3100"),
            ("COURSEHUB__LOGGING__LEVEL", "debug"),
        ],
        || ConfigLoader::load_from_file(&path, Some("teaching")).unwrap(),
    );

    assert_eq!(config.spawn.grader_uid, 3100);
    assert_eq!(config.spawn.student_uid, 1500);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_missing_server_section_is_rejected() {
    let tree = CourseTree::new();
    let path = write_document(&tree);

    let result = with_env(&[], || ConfigLoader::load_from_file(&path, Some("lab")));
    assert!(result.is_err());
}

#[test]
fn test_validation_reports_problems() {
    let tree = CourseTree::new();
    let path = tree.path().join("hub.yaml");
    fs::write(
        &path,
        "nbgrader:\n  grader_cmds: [echo hi]\nextra_mounts:\n  enabled: true\n  volume_mounts:\n    broken:\n      name: ''\n      mountPath: /srv/broken\n",
    )
    .unwrap();

    let config = with_env(&[], || ConfigLoader::load_from_file(&path, None).unwrap());
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(errors
        .iter()
        .any(|e| e.to_string().contains("course_dir is not set")));
    assert!(errors.iter().any(|e| e.to_string().contains("broken")));
}

#[test]
fn test_extra_profile_names_survive_loading() {
    let tree = CourseTree::new();
    let path = tree.path().join("hub.yaml");
    fs::write(
        &path,
        "extra_profile_list:\n  enabled: true\n  profiles:\n    Sandbox:\n      course_display_name: Sandbox\n      image: sb:1\n      pullPolicy: Always\n",
    )
    .unwrap();

    let config = with_env(&[], || ConfigLoader::load_from_file(&path, None).unwrap());
    let engine = HubEngine::new(config);
    let menu = engine.render_menu("eve").unwrap();

    assert_eq!(menu.extra_profiles.len(), 1);
    let extra = &menu.extra_profiles[0];
    assert_eq!(extra.display_name, "Sandbox (student)");
    assert_eq!(extra.overrides.image, "sb:1");
    assert_eq!(extra.overrides.image_pull_policy, "Always");

    let typed: Selection = "extra+Sandbox".parse().unwrap();
    assert!(menu.offers(&typed));
    assert!(menu.offers(&extra.slug.parse().unwrap()));
}
