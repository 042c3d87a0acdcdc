//! Course tree discovery: courses, role directories, offerings, member lists

use super::test_utils::CourseTree;
use coursehub::registry::RegistryLoader;
use coursehub::types::{OfferingKey, Role};
use std::fs;

#[test]
fn test_loads_offerings_per_course_and_role() {
    let tree = CourseTree::new();
    tree.offering("CS101", "students", "CS101-WS24", "", Some(&["alice", "bob"]))
        .offering("CS101", "students", "CS101-SS25", "", Some(&["carol"]))
        .offering("CS101", "graders", "CS101-WS24", "", Some(&["tutor"]))
        .offering("MA200", "Students", "MA200-WS24", "", Some(&["alice"]));

    let registry = RegistryLoader::load(&tree.root()).unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.offering_count(), 4);

    let cs101 = registry.course("CS101").unwrap();
    let students: Vec<&String> = cs101.offerings(Role::Student).unwrap().keys().collect();
    assert_eq!(students, vec!["CS101-SS25", "CS101-WS24"]);
    assert_eq!(cs101.offerings(Role::Grader).unwrap().len(), 1);

    let record = registry
        .get(&OfferingKey::new("CS101", Role::Student, "CS101-WS24"))
        .unwrap();
    assert_eq!(record.members, vec!["alice".to_string(), "bob".to_string()]);
    assert!(record.has_member("bob"));
    assert!(!record.has_member("carol"));
}

#[test]
fn test_student_graders_directory_is_grader_role() {
    let tree = CourseTree::new();
    tree.offering("CS101", "student_graders", "CS101-WS24", "", Some(&["2s12345"]));

    let registry = RegistryLoader::load(&tree.root()).unwrap();
    let key = OfferingKey::new("CS101", Role::Grader, "CS101-WS24");
    assert!(registry.get(&key).unwrap().has_member("2s12345"));
    assert!(registry.course("CS101").unwrap().offerings(Role::Student).is_none());
}

#[test]
fn test_offering_without_member_list_has_no_members() {
    let tree = CourseTree::new();
    tree.offering("CS101", "students", "CS101-WS24", "image: custom:1\n", None);

    let registry = RegistryLoader::load(&tree.root()).unwrap();
    let record = registry
        .get(&OfferingKey::new("CS101", Role::Student, "CS101-WS24"))
        .unwrap();
    assert!(record.members.is_empty());
    assert!(record.members_source.is_none());
    assert_eq!(record.config.image.as_deref(), Some("custom:1"));
}

#[test]
fn test_unrelated_entries_are_ignored() {
    let tree = CourseTree::new();
    tree.offering("CS101", "students", "CS101-WS24", "", Some(&["alice"]));

    // Course directory without any role directory
    fs::create_dir_all(tree.root().join("Drafts").join("assets")).unwrap();
    // Hidden course directory
    tree.offering(".archive", "students", "OLD", "", Some(&["alice"]));
    // Loose files at course and role level
    fs::write(tree.root().join("README.md"), "notes").unwrap();
    fs::write(
        tree.root().join("CS101").join("students").join("notes.txt"),
        "ignored",
    )
    .unwrap();
    // Member list with no config
    fs::write(
        tree.root().join("CS101").join("students").join("CS101-SS25.csv"),
        "Username\ndave\n",
    )
    .unwrap();

    let registry = RegistryLoader::load(&tree.root()).unwrap();
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.offering_count(), 1);
    assert!(registry.course("Drafts").is_none());
    assert!(registry.course(".archive").is_none());
}

#[test]
fn test_malformed_config_degrades_to_defaults() {
    let tree = CourseTree::new();
    tree.offering("CS101", "students", "CS101-WS24", "image: [unclosed\n", Some(&["alice"]))
        .offering("CS101", "students", "CS101-SS25", "- just\n- a list\n", Some(&["alice"]));

    let registry = RegistryLoader::load(&tree.root()).unwrap();
    assert_eq!(registry.offering_count(), 2);
    for (_, record) in registry.offerings() {
        assert_eq!(record.config, Default::default());
        assert!(record.has_member("alice"));
    }
}

#[test]
fn test_member_list_without_username_column_is_empty() {
    let tree = CourseTree::new();
    tree.offering("CS101", "students", "CS101-WS24", "", None);
    fs::write(
        tree.root().join("CS101").join("students").join("CS101-WS24.csv"),
        "Name,Email\nalice,alice@example.org\n",
    )
    .unwrap();

    let registry = RegistryLoader::load(&tree.root()).unwrap();
    let record = registry
        .get(&OfferingKey::new("CS101", Role::Student, "CS101-WS24"))
        .unwrap();
    assert!(record.members.is_empty());
}

#[test]
fn test_missing_root_is_error() {
    let tree = CourseTree::new();
    assert!(RegistryLoader::load(&tree.path().join("absent")).is_err());

    let file = tree.path().join("file.txt");
    fs::write(&file, "x").unwrap();
    assert!(RegistryLoader::load(&file).is_err());
}

#[cfg(unix)]
#[test]
fn test_dangling_symlinks_do_not_hide_offerings() {
    use std::os::unix::fs::symlink;

    let tree = CourseTree::new();
    tree.offering("CS101", "students", "CS101-WS24", "", Some(&["alice"]))
        .offering("MA200", "graders", "MA200-WS24", "", Some(&["tutor"]));
    let role_dir = tree.root().join("CS101").join("students");
    symlink("/nonexistent/stale.yaml", role_dir.join("stale.yaml")).unwrap();
    symlink("/nonexistent/OldCourse", tree.root().join("OldCourse")).unwrap();

    let registry = RegistryLoader::load(&tree.root()).unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(registry.offering_count(), 2);
    assert!(registry
        .get(&OfferingKey::new("CS101", Role::Student, "CS101-WS24"))
        .unwrap()
        .has_member("alice"));
    assert!(registry.course("OldCourse").is_none());
}
