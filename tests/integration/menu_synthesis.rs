//! Profile menu synthesis through the engine

use super::test_utils::CourseTree;
use coursehub::config::{ExchangeConfig, ExtraProfileList};
use coursehub::engine::HubEngine;
use coursehub::registry::CourseConfig;
use coursehub::types::{OfferingKey, ProfileSlug, Role, Selection};
use std::collections::BTreeMap;

fn two_course_tree() -> CourseTree {
    let tree = CourseTree::new();
    tree.offering(
        "CS101",
        "students",
        "CS101-WS24",
        "choice_display_name: Winter 2024\ncourse_cmds:\n  - echo ws24\n",
        Some(&["alice", "bob"]),
    )
    .offering(
        "CS101",
        "students",
        "CS101-SS24",
        "choice_display_name: Summer 2024\ncourse_cmds:\n  - echo ss24\n",
        Some(&["alice"]),
    )
    .offering("CS101", "graders", "CS101-WS24", "", Some(&["alice", "tutor"]))
    .offering(
        "AI300",
        "students",
        "AI300-WS24",
        "course_display_name: Applied AI\n",
        Some(&["alice"]),
    );
    tree
}

#[test]
fn test_menu_lists_only_member_offerings() {
    let tree = two_course_tree();
    let menu = tree.engine().render_menu("bob").unwrap();

    assert!(!menu.suppressed);
    assert!(menu.default.is_some());
    assert_eq!(menu.courses.len(), 1);
    let course = &menu.courses[0];
    assert_eq!(course.slug, ProfileSlug::new("CS101", Role::Student));
    assert_eq!(course.choices.len(), 1);
    assert_eq!(
        course.choices[0].key,
        OfferingKey::new("CS101", Role::Student, "CS101-WS24")
    );
}

#[test]
fn test_profiles_sorted_by_label_and_graders_tinted() {
    let tree = two_course_tree();
    let menu = tree.engine().render_menu("alice").unwrap();

    let labels: Vec<&str> = menu.courses.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["Applied AI (student)", "CS101 (grader)", "CS101 (student)"]
    );

    let grader = menu.course(&ProfileSlug::new("CS101", Role::Grader)).unwrap();
    assert_eq!(
        grader.display_name,
        "<span style=\"color:blue;\">CS101 (grader)</span>"
    );
    let student = menu.course(&ProfileSlug::new("CS101", Role::Student)).unwrap();
    assert_eq!(student.display_name, "CS101 (student)");

    let choices: Vec<&str> = student
        .choices
        .iter()
        .map(|c| c.display_name.as_str())
        .collect();
    assert_eq!(choices, vec!["Summer 2024", "Winter 2024"]);
    assert_eq!(menu.entry_count(), 1 + 4);
}

#[test]
fn test_offering_commands_do_not_leak_between_choices() {
    let tree = two_course_tree();
    let menu = tree.engine().render_menu("alice").unwrap();

    let script = |offering: &str| {
        menu.choice(&OfferingKey::new("CS101", Role::Student, offering))
            .unwrap()
            .overrides
            .lifecycle_hooks
            .as_ref()
            .unwrap()
            .post_start_script()
            .to_string()
    };
    let winter = script("CS101-WS24");
    let summer = script("CS101-SS24");

    assert!(winter.contains("echo ws24"));
    assert!(!winter.contains("echo ss24"));
    assert!(summer.contains("echo ss24"));
    assert!(!summer.contains("echo ws24"));

    let default_script = menu
        .default
        .as_ref()
        .unwrap()
        .overrides
        .lifecycle_hooks
        .as_ref()
        .unwrap()
        .post_start_script()
        .to_string();
    assert!(!default_script.contains("course_id"));
}

#[test]
fn test_offering_without_member_list_is_never_offered() {
    let tree = CourseTree::new();
    tree.offering("CS101", "students", "CS101-WS24", "", None)
        .offering("CS101", "students", "CS101-SS25", "", Some(&["alice"]));
    let engine = tree.engine();

    let registry = engine.load_registry().unwrap();
    let orphan = OfferingKey::new("CS101", Role::Student, "CS101-WS24");
    assert!(registry.get(&orphan).is_some());

    for user in ["alice", "bob", ""] {
        let menu = engine.render_menu(user).unwrap();
        assert!(!menu.offers(&Selection::Offering(orphan.clone())));
    }

    let menu = engine.render_menu("alice").unwrap();
    assert_eq!(menu.choices().count(), 1);
}

#[test]
fn test_blocked_wins_over_allowed() {
    let tree = two_course_tree();
    tree.user_list("allowed_users.csv", &["alice", "bob"])
        .user_list("blocked_users.csv", &["alice"]);
    let engine = tree.engine();

    let identity = engine.user_identity("alice");
    assert!(identity.is_allowed);
    assert!(identity.is_blocked);

    let menu = engine.render_menu("alice").unwrap();
    assert!(menu.suppressed);
    assert_eq!(menu.entry_count(), 0);
    assert!(menu.courses.is_empty());

    assert!(!engine.render_menu("bob").unwrap().suppressed);
}

#[test]
fn test_course_overrides_flow_into_choice() {
    let tree = CourseTree::new();
    tree.offering(
        "ML400",
        "students",
        "ML400-WS24",
        r#"
image: registry.example.org/ml:2
pullPolicy: Always
verbose_profile_list: true
resources:
  cpu_limit: 4
  mem_limit: 8000000000
  node_affinity:
    matchExpressions:
      - key: hub.jupyter.org/node-purpose
        operator: In
        values: [gpu]
extra_profile_description:
  - GPU enabled
"#,
        Some(&["alice"]),
    );

    let menu = tree.engine().render_menu("alice").unwrap();
    let choice = menu
        .choice(&OfferingKey::new("ML400", Role::Student, "ML400-WS24"))
        .unwrap();

    assert_eq!(choice.overrides.image, "registry.example.org/ml:2");
    assert_eq!(choice.overrides.image_pull_policy, "Always");
    assert_eq!(choice.overrides.cpu_limit, 4.0);
    assert_eq!(choice.overrides.mem_limit, "8.0G");
    assert_eq!(
        choice.description,
        "resource: 4vCPUs 8.0G RAM, nodes: gpu<br>image: registry.example.org/ml:2, pullPolicy: Always<br>GPU enabled"
    );
}

#[test]
fn test_extra_profiles_need_no_membership() {
    let tree = two_course_tree();
    let mut config = tree.config();
    let mut profiles = BTreeMap::new();
    profiles.insert(
        "Data Lab".to_string(),
        CourseConfig {
            image: Some("datalab:1".to_string()),
            ..Default::default()
        },
    );
    config.server.extra_profile_list = Some(ExtraProfileList {
        enabled: true,
        profiles,
    });
    let engine = HubEngine::new(config);

    let menu = engine.render_menu("stranger").unwrap();
    assert!(menu.courses.is_empty());
    let extra = menu.extra_profile("Data Lab").unwrap();
    assert_eq!(extra.slug, "extra+Data Lab");
    assert_eq!(extra.overrides.image, "datalab:1");
    assert!(menu.offers(&extra.slug.parse::<Selection>().unwrap()));
}

#[test]
fn test_exchange_flags_written_into_offering_commands() {
    let tree = CourseTree::new();
    tree.offering(
        "CS101",
        "students",
        "CS101-WS24",
        "exchange:\n  personalized_inbound: true\n  commands:\n    - mkdir -p /srv/exchange\n",
        Some(&["alice"]),
    );
    let mut config = tree.config();
    if let Some(nbgrader) = config.server.nbgrader.as_mut() {
        nbgrader.default_exchange = Some(ExchangeConfig {
            personalized_feedback: Some(false),
            ..Default::default()
        });
    }
    let menu = HubEngine::new(config).render_menu("alice").unwrap();
    let script = menu
        .choice(&OfferingKey::new("CS101", Role::Student, "CS101-WS24"))
        .unwrap()
        .overrides
        .lifecycle_hooks
        .as_ref()
        .unwrap()
        .post_start_script()
        .to_string();

    assert!(script.contains("mkdir -p /srv/exchange"));
    assert!(script.contains("c.Exchange.personalized_inbound = True"));
    assert!(script.contains("c.Exchange.personalized_feedback = False"));
    assert!(!script.contains("personalized_outbound"));
}
