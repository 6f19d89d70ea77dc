//! Graph fixture for mutation tests, built by hand the way the builder
//! would have produced it

use std::sync::Arc;

use depgraph_core::{
    DeclKind, EXTERNAL_NODE_ID, Graph, Link, LinkKind, Node, NodeDecl, ROOT_NODE_ID,
    SourceLocation, SymbolHandle, Visibility,
};

pub struct FixtureNode {
    id: String,
    decl: Option<NodeDecl>,
    locations: Vec<SourceLocation>,
    children: Vec<FixtureNode>,
}

impl FixtureNode {
    fn new(id: String, decl: Option<NodeDecl>, locations: Vec<SourceLocation>) -> Self {
        FixtureNode {
            id,
            decl,
            locations,
            children: Vec::new(),
        }
    }

    fn add(
        &mut self,
        id: String,
        decl: Option<NodeDecl>,
        locations: Vec<SourceLocation>,
    ) -> &mut FixtureNode {
        self.children.push(FixtureNode::new(id, decl, locations));
        self.children.last_mut().expect("just pushed")
    }

    fn child_id(&self, name: &str) -> String {
        if self.id == ROOT_NODE_ID || self.id == EXTERNAL_NODE_ID {
            name.to_string()
        } else if matches!(
            self.decl.as_ref().map(|d| d.kind),
            Some(DeclKind::Assembly) | Some(DeclKind::Module)
        ) {
            format!("{}/{}", self.id, name)
        } else {
            format!("{}.{}", self.id, name)
        }
    }

    fn make_decl(kind: DeclKind, name: &str, display: &str) -> Option<NodeDecl> {
        Some(NodeDecl {
            symbol: SymbolHandle(0),
            kind,
            name: name.to_string(),
            display: display.to_string(),
            visibility: Visibility::Public,
        })
    }

    /// Assembly node; useful for nesting under grouping nodes.
    pub fn assembly(&mut self, name: &str) -> &mut FixtureNode {
        self.add(
            format!("{name}.dll"),
            Self::make_decl(DeclKind::Assembly, name, &format!("{name}.dll")),
            vec![SourceLocation::local(format!("{name}.csproj"), 0, 0)],
        )
    }

    pub fn namespace(&mut self, name: &str) -> &mut FixtureNode {
        let display = match &self.decl {
            Some(d) if d.kind == DeclKind::Namespace => format!("{}.{}", d.display, name),
            _ => name.to_string(),
        };
        let id = self.child_id(name);
        let decl = Self::make_decl(DeclKind::Namespace, name, &display);
        self.add(id, decl, vec![SourceLocation::local("src/lib.cs", 1, 1)])
    }

    pub fn class(&mut self, name: &str) -> &mut FixtureNode {
        let id = self.child_id(name);
        let decl = Self::make_decl(DeclKind::Class, name, name);
        self.add(id, decl, vec![SourceLocation::local("src/lib.cs", 1, 1)])
    }

    pub fn interface(&mut self, name: &str) -> &mut FixtureNode {
        let id = self.child_id(name);
        let decl = Self::make_decl(DeclKind::Interface, name, name);
        self.add(id, decl, vec![SourceLocation::local("src/lib.cs", 1, 1)])
    }

    /// Member segment, e.g. `method("M()")`.
    pub fn method(&mut self, name: &str) -> &mut FixtureNode {
        let id = self.child_id(name);
        let decl = Self::make_decl(DeclKind::Method, name, name);
        self.add(id, decl, vec![SourceLocation::local("src/lib.cs", 2, 5)])
    }

    pub fn field(&mut self, name: &str) -> &mut FixtureNode {
        let id = self.child_id(name);
        let decl = Self::make_decl(DeclKind::Field, name, name);
        self.add(id, decl, vec![SourceLocation::local("src/lib.cs", 2, 5)])
    }

    /// Declaration-less grouping node.
    pub fn group(&mut self, name: &str) -> &mut FixtureNode {
        let id = self.child_id(name);
        self.add(id, None, vec![])
    }

    pub fn visibility(&mut self, visibility: Visibility) -> &mut FixtureNode {
        self.decl
            .as_mut()
            .expect("only declared nodes carry visibility")
            .visibility = visibility;
        self
    }

    fn freeze(&self) -> Arc<Node> {
        let mut node = Node::new(self.id.as_str(), self.decl.clone());
        node.locations = self.locations.clone();
        node.children = self.children.iter().map(|c| c.freeze()).collect();
        Arc::new(node)
    }
}

pub struct GraphFixture {
    root: FixtureNode,
    external: FixtureNode,
    links: Vec<Link>,
}

impl GraphFixture {
    pub fn new() -> Self {
        GraphFixture {
            root: FixtureNode::new(ROOT_NODE_ID.to_string(), None, vec![]),
            external: FixtureNode::new(EXTERNAL_NODE_ID.to_string(), None, vec![]),
            links: Vec::new(),
        }
    }

    pub fn assembly(&mut self, name: &str) -> &mut FixtureNode {
        self.root.assembly(name)
    }

    pub fn external_assembly(&mut self, name: &str) -> &mut FixtureNode {
        self.external.add(
            format!("{name}.dll"),
            FixtureNode::make_decl(DeclKind::Assembly, name, &format!("{name}.dll")),
            vec![SourceLocation::external(name)],
        )
    }

    /// Namespace directly under Root, outside any assembly.
    pub fn namespace(&mut self, name: &str) -> &mut FixtureNode {
        self.root.namespace(name)
    }

    pub fn group(&mut self, name: &str) -> &mut FixtureNode {
        self.root.group(name)
    }

    pub fn link(&mut self, source: &str, target: &str) {
        let line = self.links.len() as u32 + 1;
        self.links.push(Link::new(
            source,
            target,
            LinkKind::Reference,
            SourceLocation::local("src/lib.cs", line, 1),
        ));
    }

    pub fn build(&self) -> Graph {
        let mut children = vec![self.external.freeze()];
        children.extend(self.root.children.iter().map(|c| c.freeze()));

        let mut root = Node::new(ROOT_NODE_ID, None);
        root.children = children;

        Graph {
            root: Arc::new(root),
            links: self.links.clone(),
        }
    }
}

/// Child ids of a node, in order.
pub fn child_ids(node: &Node) -> Vec<String> {
    node.children
        .iter()
        .map(|c| c.id.as_str().to_string())
        .collect()
}

/// The single link between two current endpoint ids, if any.
pub fn find_link<'a>(graph: &'a Graph, source: &str, target: &str) -> Option<&'a Link> {
    graph
        .links
        .iter()
        .find(|l| l.source == *source && l.target == *target)
}
