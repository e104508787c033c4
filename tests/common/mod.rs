//! Shared test doubles: a scripted dialog and a recording command runner

#![allow(dead_code)]

use archpkg::{
    ArchPkgError, Catalog, Category, ChecklistItem, ChecklistResult, CommandRunner, CommandSpec,
    CommandStatus, Dialog, MenuItem, MenuResult, PackageEntry, Result,
};
use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};

/// Editors, AUR and FLATPAK with one or two entries each
pub fn sample_catalog() -> Catalog {
    Catalog::new(vec![
        Category::new(
            "Editors",
            "Text editors",
            vec![
                PackageEntry::new("vim", "Vim editor"),
                PackageEntry::new("nano", "Nano editor"),
            ],
        ),
        Category::new("AUR", "AUR packages", vec![PackageEntry::new("yay-extra", "extra AUR pkg")]),
        Category::new("FLATPAK", "Flatpak apps", vec![PackageEntry::new("org.app.One", "App One")]),
    ])
    .expect("sample catalog is valid")
}

/// One scripted answer
#[derive(Debug, Clone)]
pub enum Answer {
    Menu(MenuResult),
    Checklist(ChecklistResult),
    YesNo(bool),
    Message,
}

impl Answer {
    pub fn choose(id: &str) -> Self {
        Answer::Menu(MenuResult::Chosen(id.to_string()))
    }

    pub fn confirm(ids: &[&str]) -> Self {
        Answer::Checklist(ChecklistResult::Confirmed(
            ids.iter().map(|s| s.to_string()).collect(),
        ))
    }
}

/// What the session showed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shown {
    Menu { title: String, items: Vec<MenuItem> },
    Checklist { title: String, items: Vec<ChecklistItem> },
    YesNo { title: String, text: String },
    Message { title: String, text: String },
}

/// Dialog that replays a fixed list of answers
#[derive(Debug, Default)]
pub struct ScriptedDialog {
    answers: VecDeque<Answer>,
    pub shown: Vec<Shown>,
}

impl ScriptedDialog {
    pub fn new(answers: Vec<Answer>) -> Self {
        Self {
            answers: answers.into(),
            shown: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.answers.len()
    }

    fn next(&mut self) -> Result<Answer> {
        self.answers
            .pop_front()
            .ok_or_else(|| ArchPkgError::terminal("script exhausted"))
    }

    pub fn checklists(&self) -> Vec<&Vec<ChecklistItem>> {
        self.shown
            .iter()
            .filter_map(|s| match s {
                Shown::Checklist { items, .. } => Some(items),
                _ => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.shown
            .iter()
            .filter_map(|s| match s {
                Shown::Message { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn questions(&self) -> Vec<&str> {
        self.shown
            .iter()
            .filter_map(|s| match s {
                Shown::YesNo { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Dialog for ScriptedDialog {
    fn checklist(&mut self, title: &str, items: &[ChecklistItem]) -> Result<ChecklistResult> {
        self.shown.push(Shown::Checklist {
            title: title.to_string(),
            items: items.to_vec(),
        });
        match self.next()? {
            Answer::Checklist(result) => Ok(result),
            other => panic!("checklist '{}' got scripted answer {:?}", title, other),
        }
    }

    fn menu(&mut self, title: &str, items: &[MenuItem]) -> Result<MenuResult> {
        self.shown.push(Shown::Menu {
            title: title.to_string(),
            items: items.to_vec(),
        });
        match self.next()? {
            Answer::Menu(result) => Ok(result),
            other => panic!("menu '{}' got scripted answer {:?}", title, other),
        }
    }

    fn yes_no(&mut self, title: &str, text: &str) -> Result<bool> {
        self.shown.push(Shown::YesNo {
            title: title.to_string(),
            text: text.to_string(),
        });
        match self.next()? {
            Answer::YesNo(answer) => Ok(answer),
            other => panic!("yes/no '{}' got scripted answer {:?}", title, other),
        }
    }

    fn message(&mut self, title: &str, text: &str) -> Result<()> {
        self.shown.push(Shown::Message {
            title: title.to_string(),
            text: text.to_string(),
        });
        match self.next()? {
            Answer::Message => Ok(()),
            other => panic!("message '{}' got scripted answer {:?}", title, other),
        }
    }
}

/// Runner that records commands instead of executing them
#[derive(Default)]
pub struct RecordingRunner {
    pub commands: RefCell<Vec<CommandSpec>>,
    on_path: HashSet<String>,
    /// (program, argument) pairs whose commands exit non-zero
    failing: Vec<(String, String)>,
    remotes: String,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark binaries as installed
    pub fn with_binaries(mut self, binaries: &[&str]) -> Self {
        self.on_path.extend(binaries.iter().map(|b| b.to_string()));
        self
    }

    /// Fail any `program` invocation that has `arg` among its arguments
    pub fn failing(mut self, program: &str, arg: &str) -> Self {
        self.failing.push((program.to_string(), arg.to_string()));
        self
    }

    /// Output of `flatpak remotes --columns=name`
    pub fn with_remotes(mut self, remotes: &str) -> Self {
        self.remotes = remotes.to_string();
        self
    }

    pub fn recorded(&self) -> Vec<CommandSpec> {
        self.commands.borrow().clone()
    }

    /// Commands rendered as `program arg arg...`
    pub fn lines(&self) -> Vec<String> {
        self.commands
            .borrow()
            .iter()
            .map(|c| std::iter::once(c.program.clone()).chain(c.args.clone()).collect::<Vec<_>>().join(" "))
            .collect()
    }

    fn fails(&self, spec: &CommandSpec) -> bool {
        self.failing
            .iter()
            .any(|(program, arg)| spec.program == *program && spec.args.iter().any(|a| a == arg))
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, spec: &CommandSpec) -> Result<CommandStatus> {
        self.commands.borrow_mut().push(spec.clone());
        if self.fails(spec) {
            Ok(CommandStatus {
                success: false,
                code: Some(1),
            })
        } else {
            Ok(CommandStatus::OK)
        }
    }

    fn capture(&self, spec: &CommandSpec) -> Result<String> {
        self.commands.borrow_mut().push(spec.clone());
        if self.fails(spec) {
            Err(ArchPkgError::install(format!("`{}` failed", spec)))
        } else {
            Ok(self.remotes.clone())
        }
    }

    fn exists(&self, program: &str) -> bool {
        self.on_path.contains(program)
    }
}
