//! Rewinding the command log restores it exactly between offerings

use super::strategies::{offering_spec, OfferingSpec};
use coursehub::commands::nbgrader::{base_commands, push_offering_commands, OfferingContext};
use coursehub::commands::CommandLog;
use coursehub::config::{ServerConfig, SpawnSettings};
use coursehub::registry::CourseConfig;
use proptest::prelude::*;

fn push(log: &mut CommandLog, settings: &SpawnSettings, server: &ServerConfig, spec: &OfferingSpec) -> usize {
    let key = spec.key();
    let config = CourseConfig {
        course_cmds: spec.course_cmds.clone(),
        ..Default::default()
    };
    push_offering_commands(
        log,
        settings,
        server,
        &OfferingContext {
            course_name: &key.course,
            offering_id: &key.offering,
            role: key.role,
            config: &config,
        },
    )
}

#[test]
fn test_rewind_is_exact_across_offerings() {
    let mut runner = proptest::test_runner::TestRunner::default();

    runner
        .run(
            &(
                prop::collection::vec(offering_spec(), 2..8),
                prop::collection::vec("[a-z ]{1,12}", 0..3),
            ),
            |(specs, server_commands)| {
                let settings = SpawnSettings::default();
                let server = ServerConfig {
                    commands: server_commands,
                    ..Default::default()
                };
                let mut log = base_commands(&settings, &server);
                let base = log.commands().to_vec();

                for spec in &specs {
                    let before = log.len();
                    let checkpoint = log.mark();
                    let added = push(&mut log, &settings, &server, spec);
                    assert_eq!(log.len(), before + added);

                    // Same offering pushed onto a fresh base log yields the same commands
                    let mut fresh = base_commands(&settings, &server);
                    push(&mut fresh, &settings, &server, spec);
                    assert_eq!(log.commands(), fresh.commands());

                    log.rewind(checkpoint);
                    assert_eq!(log.commands(), base.as_slice());
                    assert_eq!(log.depth(), 0);
                }

                Ok(())
            },
        )
        .unwrap();
}

proptest! {
    #[test]
    fn scoped_leaves_log_untouched(specs in prop::collection::vec(offering_spec(), 1..6)) {
        let settings = SpawnSettings::default();
        let server = ServerConfig::default();
        let mut log = base_commands(&settings, &server);
        let base = log.commands().to_vec();

        let mut scripts = Vec::new();
        for spec in &specs {
            scripts.push(log.scoped(|log| {
                push(log, &settings, &server, spec);
                log.joined()
            }));
            prop_assert_eq!(log.commands(), base.as_slice());
        }

        for (spec, script) in specs.iter().zip(&scripts) {
            for command in &spec.course_cmds {
                prop_assert!(script.contains(command.as_str()));
            }
        }
    }
}
