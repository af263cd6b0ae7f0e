//! Scripted editing
//!
//! A script is a text file with one command per line; blank lines and lines
//! starting with `#` are skipped.
//!
//! ```text
//! tool DRAW_CIRCLE_2D
//! click            # center
//! move 4 0
//! click            # radius
//! select face 3 0
//! tool EXTRUDE
//! datum 12.5
//! action SAVE
//! ```
//!
//! The runner keeps a cursor position and a selection and turns each command
//! into an `EditorRequest` for the session. Tools are named by their lookup
//! table names, the same names the key bindings use.

use bevy::log::{debug, info, warn};
use kurbo::Point;
use std::path::Path;
use std::str::FromStr;

use super::errors::{bail, SketchContext, SketchResult, ToolError};
use super::keys::{KeyLookup, KeySequence, Keymap};
use super::session::{Core, EditorRequest};
use crate::document::ItemId;
use crate::editing::selection::{SelectableRef, Selection};
use crate::tools::catalog::{ActionToolId, InToolActionId};
use crate::tools::tool::{ToolArgs, ToolData, ToolEvent, ToolResponse};
use crate::tools::tool_id::ToolId;

#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    /// Begin a tool, or run an action, by name.
    Tool(ActionToolId),
    Move(Point),
    /// Mouse and keyboard input for the active tool.
    InTool(InToolActionId),
    Cancel,
    Datum(f64),
    Select(SelectableRef),
    Clear,
    Key(KeySequence),
}

fn parse_number<T: FromStr>(word: Option<&str>, what: &str) -> SketchResult<T> {
    let Some(word) = word else {
        bail!("missing {}", what);
    };
    match word.parse() {
        Ok(value) => Ok(value),
        Err(_) => bail!("invalid {} \"{}\"", what, word),
    }
}

fn parse_selection<'a>(mut words: impl Iterator<Item = &'a str>) -> SketchResult<SelectableRef> {
    let kind = words.next().unwrap_or_default();
    let sr = match kind {
        "entity" => {
            let id = ItemId(parse_number(words.next(), "entity id")?);
            let point = match words.next() {
                Some(word) => parse_number(Some(word), "point index")?,
                None => 0,
            };
            SelectableRef::entity(id, point)
        }
        "constraint" => SelectableRef::constraint(ItemId(parse_number(
            words.next(),
            "constraint id",
        )?)),
        "face" => {
            let group = ItemId(parse_number(words.next(), "group id")?);
            SelectableRef::face(group, parse_number(words.next(), "face index")?)
        }
        _ => bail!("select what? expected entity, constraint or face, got \"{}\"", kind),
    };
    if let Some(extra) = words.next() {
        bail!("unexpected \"{}\"", extra);
    }
    Ok(sr)
}

impl FromStr for ScriptCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> SketchResult<Self> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            bail!("empty command");
        };
        let cmd = match command {
            "tool" | "action" => {
                let Some(name) = words.next() else {
                    bail!("{} needs a name", command);
                };
                ScriptCommand::Tool(ActionToolId::parse(name)?)
            }
            "move" => {
                let x = parse_number(words.next(), "x coordinate")?;
                let y = parse_number(words.next(), "y coordinate")?;
                ScriptCommand::Move(Point::new(x, y))
            }
            "click" => ScriptCommand::InTool(InToolActionId::Lmb),
            "release" => ScriptCommand::InTool(InToolActionId::LmbRelease),
            "rclick" => ScriptCommand::InTool(InToolActionId::Rmb),
            "cancel" => ScriptCommand::Cancel,
            "datum" => ScriptCommand::Datum(parse_number(words.next(), "datum")?),
            "select" => return parse_selection(words).map(ScriptCommand::Select),
            "clear" => ScriptCommand::Clear,
            "key" => {
                let rest: Vec<&str> = words.collect();
                return Ok(ScriptCommand::Key(rest.join(" ").parse()?));
            }
            _ => bail!("unknown command \"{}\"", command),
        };
        if let Some(extra) = words.next() {
            bail!("unexpected \"{}\" after {}", extra, command);
        }
        Ok(cmd)
    }
}

/// Totals of a script run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptReport {
    pub commands: usize,
    pub commits: usize,
    pub reverts: usize,
    /// Tools that could not begin with the document and selection at hand.
    pub refused: usize,
}

pub struct ScriptRunner<'a> {
    core: &'a mut Core,
    keymap: &'a Keymap,
    cursor: Point,
    selection: Selection,
    report: ScriptReport,
}

impl<'a> ScriptRunner<'a> {
    pub fn new(core: &'a mut Core, keymap: &'a Keymap) -> Self {
        Self {
            core,
            keymap,
            cursor: Point::ZERO,
            selection: Selection::new(),
            report: ScriptReport::default(),
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn report(&self) -> ScriptReport {
        self.report
    }

    fn args(&self, event: ToolEvent) -> ToolArgs {
        ToolArgs {
            event,
            cursor: self.cursor,
            selection: self.selection.clone(),
        }
    }

    fn begin_request(&self, id: ActionToolId) -> EditorRequest {
        match id {
            ActionToolId::Tool(tool) => EditorRequest::BeginTool {
                tool,
                args: self.args(ToolEvent::None),
                transient: false,
            },
            ActionToolId::Action(action) => EditorRequest::Action(action),
        }
    }

    /// Updates cursor and selection, and returns the request the command
    /// turns into, if any.
    pub fn translate(&mut self, cmd: &ScriptCommand) -> SketchResult<Option<EditorRequest>> {
        let request = match cmd {
            ScriptCommand::Tool(id) => Some(self.begin_request(*id)),
            ScriptCommand::Move(p) => {
                self.cursor = *p;
                self.core
                    .tool_is_active()
                    .then(|| EditorRequest::Update(self.args(ToolEvent::Move)))
            }
            ScriptCommand::InTool(action) => {
                Some(EditorRequest::Update(self.args(ToolEvent::Action(*action))))
            }
            ScriptCommand::Cancel => Some(EditorRequest::Cancel),
            ScriptCommand::Datum(value) => Some(EditorRequest::Update(
                self.args(ToolEvent::Data(ToolData::Datum(*value))),
            )),
            ScriptCommand::Select(sr) => {
                self.selection.insert(*sr);
                None
            }
            ScriptCommand::Clear => {
                self.selection.clear();
                None
            }
            ScriptCommand::Key(keys) => Some(self.key_request(keys)?),
        };
        Ok(request)
    }

    fn key_request(&self, keys: &KeySequence) -> SketchResult<EditorRequest> {
        if self.core.tool_is_active() {
            if let [item] = keys.0.as_slice() {
                if let Some(action) = self.keymap.in_tool_action(item) {
                    return Ok(EditorRequest::Update(self.args(ToolEvent::Action(action))));
                }
            }
        }
        match self.keymap.lookup(keys) {
            KeyLookup::Matched(id) => Ok(self.begin_request(id)),
            KeyLookup::Pending => bail!("key sequence \"{}\" is incomplete", keys),
            KeyLookup::None => bail!("key sequence \"{}\" is not bound", keys),
        }
    }

    pub fn run_command(&mut self, cmd: &ScriptCommand) -> Result<(), ToolError> {
        self.report.commands += 1;
        let Some(request) = self.translate(cmd)? else {
            return Ok(());
        };
        debug!("Script request {:?}", request);
        match self.core.handle_request(&request) {
            Ok(Some(response)) => {
                match response {
                    ToolResponse::Commit => self.report.commits += 1,
                    ToolResponse::Revert => self.report.reverts += 1,
                    ToolResponse::Nop | ToolResponse::End => {}
                }
                if response.is_final() {
                    // Selected items may be gone.
                    self.selection.clear();
                }
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(ToolError::CannotBegin(id)) => {
                warn!("{} cannot begin here, skipped", id);
                self.report.refused += 1;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    pub fn run_str(&mut self, text: &str) -> SketchResult<ScriptReport> {
        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let code = line.split('#').next().unwrap_or_default().trim();
            if code.is_empty() {
                continue;
            }
            let cmd: ScriptCommand = code
                .parse()
                .map_err(|err: anyhow::Error| err.context(format!("line {line_no}: '{code}'")))?;
            self.run_command(&cmd).with_line_context(line_no, code)?;
        }
        if let Some(id) = self.core.active_tool() {
            warn!("Script ended while {} was active, cancelling", id);
            self.core.tool_cancel()?;
            self.report.reverts += 1;
        }
        info!(
            "Script done: {} commands, {} commits, {} reverts, {} refused",
            self.report.commands, self.report.commits, self.report.reverts, self.report.refused
        );
        Ok(self.report)
    }

    pub fn run_file(&mut self, path: impl AsRef<Path>) -> SketchResult<ScriptReport> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).with_file_context("read", path)?;
        self.run_str(&text)
    }
}

/// Prints every tool with its lookup name and catalog entry.
pub fn tool_listing() -> Vec<String> {
    use crate::tools::catalog::{catalog_item, group_name};
    ToolId::ALL
        .iter()
        .filter_map(|id| {
            let item = catalog_item(*id)?;
            Some(format!(
                "{:<22} {:<8} {}",
                id.name(),
                group_name(item.group).unwrap_or_default(),
                item.name
            ))
        })
        .collect()
}
