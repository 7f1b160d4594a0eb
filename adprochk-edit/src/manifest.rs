//! Typed view of the project manifest (`program.prj`).
//!
//! Only a fixed set of shapes is ever queried, so each query is a plain traversal:
//!
//! ```xml
//! <project>
//!   <tasks><taskName>Main</taskName><sequence>0</sequence><taskId>1</taskId></tasks>
//!   <entry>
//!     <key>0</key>
//!     <value>
//!       <paths><folder>false</folder><nodeName>Main</nodeName><path>Run Every Scan</path></paths>
//!     </value>
//!   </entry>
//! </project>
//! ```

use crate::xml;
use adprochk_types::FatalError;
use tracing::{debug, warn};
use xmltree::{Element, XMLNode};

/// Element names used by the manifest and program documents.
pub mod tags {
    pub const TASK: &str = "tasks";
    pub const TASK_NAME: &str = "taskName";
    pub const TASK_SEQUENCE: &str = "sequence";
    pub const TASK_ID: &str = "taskId";

    pub const NODE: &str = "paths";
    pub const NODE_FOLDER: &str = "folder";
    pub const NODE_NAME: &str = "nodeName";
    pub const NODE_PATH: &str = "path";

    pub const CONTAINER_KEY: &str = "key";
    pub const CONTAINER_VALUE: &str = "value";

    pub const PROGRAM_NAME: &str = "pgmName";
}

#[derive(Debug, Clone)]
pub struct Manifest {
    entry: String,
    root: Element,
}

fn is_task(el: &Element) -> bool {
    el.name == tags::TASK && xml::child_text(el, tags::TASK_NAME).is_some()
}

fn is_task_fragment(el: &Element) -> bool {
    el.name == tags::TASK
}

fn is_node(el: &Element) -> bool {
    el.name == tags::NODE
        && xml::child_text(el, tags::NODE_NAME).is_some()
        && xml::child_text(el, tags::NODE_FOLDER)
            .is_some_and(|f| f.trim().eq_ignore_ascii_case("false"))
}

fn is_unnamed_task(el: &Element) -> bool {
    el.name == tags::TASK && xml::child_text(el, tags::TASK_NAME).is_none()
}

fn is_unnamed_node(el: &Element) -> bool {
    el.name == tags::NODE
        && xml::child_text(el, tags::NODE_NAME).is_none()
        && xml::child_text(el, tags::NODE_FOLDER)
            .is_some_and(|f| f.trim().eq_ignore_ascii_case("false"))
}

fn is_keyed_container(el: &Element) -> bool {
    xml::child_text(el, tags::CONTAINER_KEY).is_some()
        && el.get_child(tags::CONTAINER_VALUE).is_some()
}

impl Manifest {
    pub fn parse(entry: &str, bytes: &[u8]) -> Result<Self, FatalError> {
        let root = xml::parse(bytes).map_err(|message| FatalError::CorruptManifest {
            entry: entry.to_string(),
            message,
        })?;
        Ok(Self {
            entry: entry.to_string(),
            root,
        })
    }

    pub fn entry(&self) -> &str {
        &self.entry
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, FatalError> {
        xml::serialize(&self.root).map_err(|message| FatalError::CorruptManifest {
            entry: self.entry.clone(),
            message,
        })
    }

    /// Task names from the task list, in document order.
    pub fn task_names(&self) -> Vec<String> {
        let mut tasks = Vec::new();
        xml::collect(&self.root, &is_task, &mut tasks);
        let names: Vec<String> = tasks
            .iter()
            .filter_map(|t| xml::child_text(t, tags::TASK_NAME))
            .collect();
        self.warn_unnamed(&is_unnamed_task, "task");
        debug!(task_names = ?names, "manifest tasks");
        names
    }

    /// Names of non-folder scheduler-path entries, in document order.
    pub fn node_names(&self) -> Vec<String> {
        let mut nodes = Vec::new();
        xml::collect(&self.root, &is_node, &mut nodes);
        let names: Vec<String> = nodes
            .iter()
            .filter_map(|n| xml::child_text(n, tags::NODE_NAME))
            .collect();
        self.warn_unnamed(&is_unnamed_node, "scheduler-path entry");
        debug!(node_names = ?names, "manifest nodes");
        names
    }

    fn warn_unnamed(&self, pred: &dyn Fn(&Element) -> bool, what: &str) {
        let mut unnamed = Vec::new();
        xml::collect(&self.root, pred, &mut unnamed);
        if !unnamed.is_empty() {
            warn!(
                manifest = %self.entry,
                count = unnamed.len(),
                "skipping {what} fragments without a name"
            );
        }
    }

    /// Task fragments in the same order as [`task_names`](Self::task_names).
    pub(crate) fn tasks_mut(&mut self) -> Vec<&mut Element> {
        let mut out = Vec::new();
        xml::collect_mut(&mut self.root, &is_task, &mut out);
        out
    }

    /// Every task fragment, named or not, in document order.
    pub(crate) fn all_task_fragments_mut(&mut self) -> Vec<&mut Element> {
        let mut out = Vec::new();
        xml::collect_mut(&mut self.root, &is_task_fragment, &mut out);
        out
    }

    /// Scheduler-path fragments in the same order as [`node_names`](Self::node_names).
    pub(crate) fn nodes_mut(&mut self) -> Vec<&mut Element> {
        let mut out = Vec::new();
        xml::collect_mut(&mut self.root, &is_node, &mut out);
        out
    }

    /// Keys of every keyed value container, in document order.
    pub fn container_keys(&self) -> Vec<String> {
        let mut containers = Vec::new();
        xml::collect(&self.root, &is_keyed_container, &mut containers);
        containers
            .iter()
            .filter_map(|c| xml::child_text(c, tags::CONTAINER_KEY))
            .collect()
    }

    /// The `<value>` element of the container keyed `key`.
    pub(crate) fn container_value_mut(&mut self, key: &str) -> Option<&mut Element> {
        let mut containers = Vec::new();
        xml::collect_mut(&mut self.root, &is_keyed_container, &mut containers);
        containers
            .into_iter()
            .find(|c| xml::child_text(c, tags::CONTAINER_KEY).as_deref() == Some(key))
            .and_then(|c| c.get_mut_child(tags::CONTAINER_VALUE))
    }

    /// Insert a task fragment in front of the first existing task fragment.
    ///
    /// Without any task the fragment is appended to the manifest root.
    pub(crate) fn insert_task_first(&mut self, fragment: Element) {
        let mut fragment = Some(fragment);
        if !insert_before_first_task(&mut self.root, &mut fragment)
            && let Some(fragment) = fragment
        {
            self.root.children.push(XMLNode::Element(fragment));
        }
    }
}

fn insert_before_first_task(el: &mut Element, fragment: &mut Option<Element>) -> bool {
    for index in 0..el.children.len() {
        if matches!(&el.children[index], XMLNode::Element(e) if is_task_fragment(e)) {
            if let Some(fragment) = fragment.take() {
                el.children.insert(index, XMLNode::Element(fragment));
            }
            return true;
        }
        if let XMLNode::Element(child) = &mut el.children[index]
            && insert_before_first_task(child, fragment)
        {
            return true;
        }
    }
    false
}
