//! Command accumulator: an ordered log of shell statements with
//! checkpoint/rewind, so one offering's setup commands never leak into the next.
//!
//! The log does not interpret shell syntax.

pub mod nbgrader;

use serde::{Serialize, Serializer};

pub const SHELL: &str = "/bin/sh";
pub const PRE_STOP_COMMAND: &str = "rm -rf /tmp/*";

/// Position in a [`CommandLog`] to rewind to
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a checkpoint does nothing unless passed to rewind"]
pub struct Checkpoint {
    len: usize,
    depth: usize,
}

impl Checkpoint {
    pub fn len(&self) -> usize {
        self.len
    }
}

/// Ordered, append-only command log with a stack of checkpoints
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLog {
    commands: Vec<String>,
    marks: Vec<usize>,
}

impl CommandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_commands(commands: Vec<String>) -> Self {
        Self {
            commands,
            marks: Vec::new(),
        }
    }

    pub fn push(&mut self, command: impl Into<String>) {
        self.commands.push(command.into());
    }

    pub fn extend<I, S>(&mut self, commands: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.commands.extend(commands.into_iter().map(Into::into));
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    /// Open checkpoints
    pub fn depth(&self) -> usize {
        self.marks.len()
    }

    pub fn mark(&mut self) -> Checkpoint {
        let checkpoint = Checkpoint {
            len: self.commands.len(),
            depth: self.marks.len(),
        };
        self.marks.push(checkpoint.len);
        checkpoint
    }

    /// Truncate back to the checkpoint, closing it and every checkpoint opened after it
    pub fn rewind(&mut self, checkpoint: Checkpoint) {
        self.commands.truncate(checkpoint.len);
        self.marks.truncate(checkpoint.depth);
    }

    /// Run `f` inside a checkpoint that is always rewound afterwards
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        let checkpoint = self.mark();
        let result = f(self);
        self.rewind(checkpoint);
        result
    }

    /// Commands joined with logical AND
    pub fn joined(&self) -> String {
        self.commands.join(" && ")
    }

    /// Container lifecycle hooks for the current log contents
    pub fn lifecycle_hooks(&self) -> LifecycleHooks {
        LifecycleHooks::new(self.joined())
    }
}

/// Container post-start and pre-stop hooks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleHooks {
    pub post_start: Vec<String>,
    pub pre_stop: Vec<String>,
}

impl LifecycleHooks {
    pub fn new(post_start_script: String) -> Self {
        Self {
            post_start: vec![SHELL.to_string(), "-c".to_string(), post_start_script],
            pre_stop: vec![
                SHELL.to_string(),
                "-c".to_string(),
                PRE_STOP_COMMAND.to_string(),
            ],
        }
    }

    /// The `sh -c` script of the post-start hook
    pub fn post_start_script(&self) -> &str {
        self.post_start.last().map(String::as_str).unwrap_or("")
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HooksRepr<'a> {
    post_start: HandlerRepr<'a>,
    pre_stop: HandlerRepr<'a>,
}

#[derive(Serialize)]
struct HandlerRepr<'a> {
    exec: ExecRepr<'a>,
}

#[derive(Serialize)]
struct ExecRepr<'a> {
    command: &'a [String],
}

impl Serialize for LifecycleHooks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        HooksRepr {
            post_start: HandlerRepr {
                exec: ExecRepr {
                    command: &self.post_start,
                },
            },
            pre_stop: HandlerRepr {
                exec: ExecRepr {
                    command: &self.pre_stop,
                },
            },
        }
        .serialize(serializer)
    }
}
