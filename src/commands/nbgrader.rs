//! Command builders that append grader and exam-kernel configuration lines to
//! the nbgrader and ipython config files at container start.

use super::CommandLog;
use crate::config::{ExamKernelConfig, ExchangeConfig, ServerConfig, SpawnSettings};
use crate::registry::CourseConfig;
use crate::types::Role;
use tracing::debug;

/// Quote a string for POSIX sh
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Python string literal
fn py_str(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', r"\\").replace('"', "\\\""))
}

fn py_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn py_list(values: &[String]) -> String {
    let items: Vec<String> = values.iter().map(|v| py_str(v)).collect();
    format!("[{}]", items.join(", "))
}

/// `echo '<line>' >> '<file>'`
pub fn append_line(line: &str, target: &str) -> String {
    format!("echo {} >> {}", shell_quote(line), shell_quote(target))
}

/// Commands shared by every profile: nbgrader prelude, server commands, exam kernel
pub fn base_commands(settings: &SpawnSettings, server: &ServerConfig) -> CommandLog {
    let mut log = CommandLog::new();
    log.push(append_line("import os", &settings.nbgrader_config_path));
    log.push(append_line("c = get_config()", &settings.nbgrader_config_path));

    for command in &server.commands {
        debug!(command = %command, "Adding server command");
        log.push(command.clone());
    }

    if let Some(exam_kernel) = &server.exam_kernel {
        log.extend(exam_kernel_commands(settings, exam_kernel));
    }
    log
}

/// Exam kernel restrictions written to the ipython config
pub fn exam_kernel_commands(settings: &SpawnSettings, exam_kernel: &ExamKernelConfig) -> Vec<String> {
    let target = &settings.ipython_config_path;
    let mut commands = vec![
        append_line("from textwrap import dedent", target),
        append_line("c = get_config()", target),
    ];

    if let Some(imports) = &exam_kernel.allowed_imports {
        debug!(count = imports.len(), "Adding exam kernel allowed imports");
        commands.push(append_line(
            &format!("c.ExamKernel.allowed_imports = {}", py_list(imports)),
            target,
        ));
    }

    if let Some(init_code) = &exam_kernel.init_code {
        debug!(lines = init_code.len(), "Adding exam kernel init code");
        let mut lines = vec![shell_quote("c.ExamKernel.init_code = \"\"\"")];
        lines.extend(init_code.iter().map(|l| shell_quote(l)));
        lines.push(shell_quote("\"\"\""));
        commands.push(format!(
            "printf '%s\\n' {} >> {}",
            lines.join(" "),
            shell_quote(target)
        ));
    }

    if let Some(magics) = &exam_kernel.allowed_magics {
        debug!(count = magics.len(), "Adding exam kernel allowed magics");
        commands.push(append_line(
            &format!("c.ExamKernel.allowed_magics = {}", py_list(magics)),
            target,
        ));
    }

    commands
}

/// Resolve the exchange declaration: course value first, then the nbgrader default
pub fn effective_exchange<'a>(
    course: &'a CourseConfig,
    server: &'a ServerConfig,
) -> Option<&'a ExchangeConfig> {
    course.exchange.as_ref().or_else(|| server.default_exchange())
}

/// Personalized channel flags after the default chain (course → nbgrader default → off)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersonalizedChannels {
    pub outbound: bool,
    pub inbound: bool,
    pub feedback: bool,
}

impl PersonalizedChannels {
    pub fn resolve(course: &CourseConfig, server: &ServerConfig) -> Self {
        let course_exchange = course.exchange.as_ref();
        let default_exchange = server.default_exchange();
        let pick = |f: fn(&ExchangeConfig) -> Option<bool>| {
            course_exchange
                .and_then(f)
                .or_else(|| default_exchange.and_then(f))
                .unwrap_or(false)
        };
        Self {
            outbound: pick(|e| e.personalized_outbound),
            inbound: pick(|e| e.personalized_inbound),
            feedback: pick(|e| e.personalized_feedback),
        }
    }
}

/// Per-offering inputs for [`push_offering_commands`]
pub struct OfferingContext<'a> {
    pub course_name: &'a str,
    pub offering_id: &'a str,
    pub role: Role,
    pub config: &'a CourseConfig,
}

impl OfferingContext<'_> {
    /// nbgrader course id: configured `course_id`, else the offering id
    pub fn course_id(&self) -> &str {
        self.config.course_id.as_deref().unwrap_or(self.offering_id)
    }
}

/// Append one offering's nbgrader setup commands to `log`.
///
/// Callers mark the log first and rewind after use; returns the number of
/// commands appended.
pub fn push_offering_commands(
    log: &mut CommandLog,
    settings: &SpawnSettings,
    server: &ServerConfig,
    offering: &OfferingContext<'_>,
) -> usize {
    let before = log.len();
    let target = &settings.nbgrader_config_path;

    log.push(append_line(
        &format!("c.CourseDirectory.course_id = {}", py_str(offering.course_id())),
        target,
    ));

    if offering.role == Role::Grader {
        let course_root = format!(
            "{}/{}/{}",
            settings.course_volume_mountpath, offering.course_name, offering.offering_id
        );
        log.push(append_line(
            &format!(
                "c.CourseDirectory.root = os.path.abspath({})",
                py_str(&course_root)
            ),
            target,
        ));
    }

    if let Some(exchange) = effective_exchange(offering.config, server) {
        for command in &exchange.commands {
            debug!(command = %command, "Adding exchange command");
            log.push(command.clone());
        }

        let declared = |f: fn(&ExchangeConfig) -> Option<bool>| {
            offering
                .config
                .exchange
                .as_ref()
                .and_then(f)
                .or_else(|| server.default_exchange().and_then(f))
        };
        let flags = [
            ("personalized_outbound", declared(|e| e.personalized_outbound)),
            ("personalized_inbound", declared(|e| e.personalized_inbound)),
            ("personalized_feedback", declared(|e| e.personalized_feedback)),
        ];
        for (name, value) in flags {
            if let Some(value) = value {
                log.push(append_line(
                    &format!("c.Exchange.{} = {}", name, py_bool(value)),
                    target,
                ));
            }
        }
    }

    if offering.role == Role::Grader {
        log.extend(server.grader_cmds().iter().cloned());
    }

    for command in &offering.config.course_cmds {
        debug!(command = %command, "Adding course command");
        log.push(command.clone());
    }

    log.len() - before
}
