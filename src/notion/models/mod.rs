//! Typed Notion objects.
//!
//! Sub-typed objects (blocks, property values, rich text, parents, icons,
//! file sources) are enums keyed on the provider's `type` field with an
//! `Unknown` variant carrying the raw JSON of anything unrecognised.

mod block;
mod common;
mod objects;
mod payload;
mod property;
mod tagged;

pub use block::{
    Block, BlockContent, ChildBlock, CodeBlock, FileBlock, LinkBlock, TextBlock, ToDoBlock,
};
pub use common::{
    Annotations, Equation, ExternalFile, FileSource, HostedFile, Icon, Link, Parent, Person,
    RichText, RichTextContent, TextContent, User,
};
pub use objects::{Comment, Database, Page, Paginated};
pub use payload::{
    AppendBlockChildrenPayload, CreateCommentPayload, CreatePagePayload, QueryDatabasePayload,
    UpdatePagePayload,
};
pub use property::{
    DateRange, File, PageReference, PropertyData, PropertyItem, PropertySchema, PropertyValue,
    SelectOption,
};
