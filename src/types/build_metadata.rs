// ABOUTME: CI build metadata and the tag sets derived from it.
// ABOUTME: Tags are attached to every object, task definition, and artifact a run touches.

use super::CommitId;
use serde_json::{Map, Value};

pub const TAG_COMMIT_ID: &str = "CI_COMMIT_ID";
pub const TAG_MESSAGE: &str = "CI_MESSAGE";
pub const TAG_BRANCH: &str = "CI_BRANCH";
pub const TAG_BUILD_NUMBER: &str = "CI_BUILD_NUMBER";
pub const TAG_COMMITTER_EMAIL: &str = "CI_COMMITTER_EMAIL";
pub const TAG_COMMITTER_NAME: &str = "CI_COMMITTER_NAME";
pub const TAG_COMMITTER_USERNAME: &str = "CI_COMMITTER_USERNAME";
pub const TAG_BUILD_URL: &str = "CI_BUILD_URL";

/// Maximum tag value length accepted by the object and task-definition APIs.
pub const MAX_TAG_VALUE_LEN: usize = 256;

/// Facts about the CI build driving this invocation.
///
/// Built once from command-line flags and the environment, then only read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildMetadata {
    commit_id: CommitId,
    message: String,
    branch: String,
    build_number: String,
    build_url: String,
    committer_email: String,
    committer_username: String,
    committer_name: String,
}

impl BuildMetadata {
    pub fn new(commit_id: CommitId) -> Self {
        Self {
            commit_id,
            message: String::new(),
            branch: String::new(),
            build_number: String::new(),
            build_url: String::new(),
            committer_email: String::new(),
            committer_username: String::new(),
            committer_name: String::new(),
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn build_number(mut self, build_number: impl Into<String>) -> Self {
        self.build_number = build_number.into();
        self
    }

    pub fn build_url(mut self, build_url: impl Into<String>) -> Self {
        self.build_url = build_url.into();
        self
    }

    pub fn committer_email(mut self, email: impl Into<String>) -> Self {
        self.committer_email = email.into();
        self
    }

    pub fn committer_username(mut self, username: impl Into<String>) -> Self {
        self.committer_username = username.into();
        self
    }

    pub fn committer_name(mut self, name: impl Into<String>) -> Self {
        self.committer_name = name.into();
        self
    }

    pub fn commit_id(&self) -> &CommitId {
        &self.commit_id
    }

    pub fn branch_name(&self) -> &str {
        &self.branch
    }

    /// Derive the tag set attached to everything this build deploys.
    pub fn to_tags(&self) -> TagSet {
        let mut tags = TagSet::default();
        tags.push(TAG_COMMIT_ID, self.commit_id.as_str());
        tags.push(TAG_MESSAGE, &self.message);
        tags.push(TAG_BRANCH, &self.branch);
        tags.push(TAG_BUILD_NUMBER, &self.build_number);
        tags.push(TAG_COMMITTER_EMAIL, &self.committer_email);
        tags.push(TAG_COMMITTER_NAME, &self.committer_name);
        tags.push(TAG_COMMITTER_USERNAME, &self.committer_username);
        if !self.build_url.is_empty() {
            tags.push(TAG_BUILD_URL, &self.build_url);
        }
        tags
    }
}

/// Member naming used by a tagging API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagCasing {
    /// `Key` / `Value`, used by object tagging.
    Capitalized,
    /// `key` / `value`, used by task-definition tagging.
    Lowercase,
}

impl TagCasing {
    fn members(self) -> (&'static str, &'static str) {
        match self {
            TagCasing::Capitalized => ("Key", "Value"),
            TagCasing::Lowercase => ("key", "value"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// Ordered key/value pairs with values already valid for AWS tagging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<Tag>,
    sanitized: Vec<String>,
}

impl TagSet {
    /// Append a tag, sanitizing the value if needed.
    pub fn push(&mut self, key: &str, value: &str) {
        let clean = sanitize_tag_value(value);
        if clean != value {
            self.sanitized.push(key.to_string());
        }
        self.tags.push(Tag {
            key: key.to_string(),
            value: clean,
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }

    /// Keys whose values were rewritten to satisfy the tag grammar.
    pub fn sanitized_keys(&self) -> &[String] {
        &self.sanitized
    }

    /// The JSON wire shape: an array of two-member objects.
    pub fn to_wire(&self, casing: TagCasing) -> Value {
        let (key_member, value_member) = casing.members();
        Value::Array(
            self.tags
                .iter()
                .map(|tag| {
                    let mut pair = Map::new();
                    pair.insert(key_member.to_string(), Value::String(tag.key.clone()));
                    pair.insert(value_member.to_string(), Value::String(tag.value.clone()));
                    Value::Object(pair)
                })
                .collect(),
        )
    }
}

/// Rewrite `value` into the character set shared by object and resource tags.
///
/// Letters, digits, spaces and `+ - = . _ : / @` pass through; other
/// whitespace becomes a space and anything else becomes `_`. The result is
/// cut at 256 characters.
pub fn sanitize_tag_value(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, ' ' | '+' | '-' | '=' | '.' | '_' | ':' | '/' | '@')
            {
                c
            } else if c.is_whitespace() {
                ' '
            } else {
                '_'
            }
        })
        .take(MAX_TAG_VALUE_LEN)
        .collect()
}
