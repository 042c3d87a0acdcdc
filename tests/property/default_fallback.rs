//! A course config without recognized keys resolves to the spawner defaults

use coursehub::config::ResourceDefaults;
use coursehub::profile::{default_node_purpose, resolve_overrides};
use coursehub::registry::{format_gigabytes, CourseConfig};
use coursehub::types::Role;
use proptest::prelude::*;
use std::path::Path;

fn resource_defaults() -> impl Strategy<Value = ResourceDefaults> {
    (
        "[a-z]{1,10}(:[0-9]{1,3})?",
        prop::sample::select(vec!["Always", "IfNotPresent", "Never"]),
        1u32..64,
        0u32..64,
        1u64..64_000_000_000,
        0u64..64_000_000_000,
    )
        .prop_map(
            |(image, pull_policy, cpu_limit, cpu_guarantee, mem_limit, mem_guarantee)| {
                ResourceDefaults {
                    image,
                    image_pull_policy: pull_policy.to_string(),
                    cpu_limit: f64::from(cpu_limit) / 2.0,
                    cpu_guarantee: f64::from(cpu_guarantee) / 4.0,
                    mem_limit,
                    mem_guarantee,
                }
            },
        )
}

proptest! {
    #[test]
    fn unrecognized_keys_fall_back_to_defaults(
        defaults in resource_defaults(),
        keys in prop::collection::btree_map("x_[a-z]{1,8}", 0u32..100, 0..5),
        grader in any::<bool>(),
    ) {
        let yaml: String = keys
            .iter()
            .map(|(key, value)| format!("{}: {}\n", key, value))
            .collect();
        let config = CourseConfig::from_yaml_str(&yaml, Path::new("generated.yaml"));
        prop_assert_eq!(&config, &CourseConfig::default());

        let role = if grader { Role::Grader } else { Role::Student };
        let overrides = resolve_overrides(&defaults, &config, role);

        prop_assert_eq!(overrides.cpu_limit, defaults.cpu_limit);
        prop_assert_eq!(overrides.cpu_guarantee, defaults.cpu_guarantee);
        prop_assert_eq!(&overrides.mem_limit, &format_gigabytes(defaults.mem_limit as f64));
        prop_assert_eq!(&overrides.mem_guarantee, &format_gigabytes(defaults.mem_guarantee as f64));
        prop_assert_eq!(&overrides.image, &defaults.image);
        prop_assert_eq!(&overrides.image_pull_policy, &defaults.image_pull_policy);
        prop_assert_eq!(overrides.node_flavor(), default_node_purpose(role));
    }
}
