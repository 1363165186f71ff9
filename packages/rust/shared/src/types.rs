//! Core domain types for product-description blocks.
//!
//! A product description is an ordered list of [`Block`]s. Every block shares
//! a small common header (id, title, column arity, visibility, style) and a
//! type-specific body ([`BlockContent`]) discriminated by the `type` field in
//! the JSON representation consumed by the editor.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Smallest column arity a block can be laid out with.
pub const MIN_COLUMNS: u8 = 1;

/// Largest column arity a block can be laid out with.
pub const MAX_COLUMNS: u8 = 4;

// ---------------------------------------------------------------------------
// BlockId
// ---------------------------------------------------------------------------

/// A UUID v7 wrapper for block identifiers (time-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(pub Uuid);

impl BlockId {
    /// Generate a new time-sortable block identifier.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Default for BlockId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for BlockId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

// ---------------------------------------------------------------------------
// BlockType
// ---------------------------------------------------------------------------

/// The block-type vocabulary shared by the editor, importer and exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockType {
    Hero,
    Text,
    Features,
    Benefits,
    Specifications,
    Image,
    Gallery,
    ImageText,
    TextImage,
    Faq,
    Cta,
    Video,
}

impl BlockType {
    /// Every block type, in editor palette order.
    pub const ALL: [BlockType; 12] = [
        BlockType::Hero,
        BlockType::Text,
        BlockType::Features,
        BlockType::Benefits,
        BlockType::Specifications,
        BlockType::Image,
        BlockType::Gallery,
        BlockType::ImageText,
        BlockType::TextImage,
        BlockType::Faq,
        BlockType::Cta,
        BlockType::Video,
    ];

    /// The `type` discriminator as it appears in JSON and `data-block-type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Hero => "hero",
            BlockType::Text => "text",
            BlockType::Features => "features",
            BlockType::Benefits => "benefits",
            BlockType::Specifications => "specifications",
            BlockType::Image => "image",
            BlockType::Gallery => "gallery",
            BlockType::ImageText => "imageText",
            BlockType::TextImage => "textImage",
            BlockType::Faq => "faq",
            BlockType::Cta => "cta",
            BlockType::Video => "video",
        }
    }

    /// Display title given to a freshly created block of this type.
    pub fn default_title(&self) -> &'static str {
        match self {
            BlockType::Hero => "Hero Section",
            BlockType::Text => "Text Block",
            BlockType::Features => "Features",
            BlockType::Benefits => "Benefits",
            BlockType::Specifications => "Specifications",
            BlockType::Image => "Image",
            BlockType::Gallery => "Gallery",
            BlockType::ImageText => "Image + Text",
            BlockType::TextImage => "Text + Image",
            BlockType::Faq => "FAQ",
            BlockType::Cta => "Call to Action",
            BlockType::Video => "Video",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BlockType {
    type Err = crate::BlockBuilderError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| crate::BlockBuilderError::validation(format!("unknown block type '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

/// Optional presentation overrides attached to a block by the editor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alignment: Option<String>,
}

/// One typed content unit of a product description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Unique within a description.
    pub id: BlockId,
    /// Display title shown in the editor's block list.
    pub title: String,
    /// Column-layout arity, 1 to 4.
    pub columns: u8,
    /// Hidden blocks stay in the description but are not rendered.
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<BlockStyle>,
    /// Type discriminator and type-specific fields.
    #[serde(flatten)]
    pub content: BlockContent,
}

impl Block {
    /// The block's type discriminator.
    pub fn block_type(&self) -> BlockType {
        self.content.block_type()
    }

    /// Check the invariants the editor relies on.
    pub fn validate(&self) -> crate::Result<()> {
        if !(MIN_COLUMNS..=MAX_COLUMNS).contains(&self.columns) {
            return Err(crate::BlockBuilderError::validation(format!(
                "block {} has {} columns, expected {MIN_COLUMNS}..={MAX_COLUMNS}",
                self.id, self.columns
            )));
        }
        Ok(())
    }
}

/// Type-specific block fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BlockContent {
    Hero {
        heading: String,
        subheading: String,
        button_text: String,
        button_url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        background_image: Option<String>,
    },
    Text {
        heading: String,
        /// Sanitized HTML.
        content: String,
    },
    Features {
        heading: String,
        items: Vec<FeatureItem>,
    },
    Benefits {
        heading: String,
        items: Vec<FeatureItem>,
    },
    Specifications {
        heading: String,
        specs: Vec<SpecItem>,
    },
    Image {
        src: String,
        alt: String,
        caption: String,
    },
    Gallery {
        heading: String,
        images: Vec<GalleryImage>,
    },
    /// Image on the left, text on the right.
    ImageText {
        heading: String,
        content: String,
        image_src: String,
        image_alt: String,
    },
    /// Text on the left, image on the right.
    TextImage {
        heading: String,
        content: String,
        image_src: String,
        image_alt: String,
    },
    Faq {
        heading: String,
        questions: Vec<FaqItem>,
    },
    Cta {
        heading: String,
        content: String,
        button_text: String,
        button_url: String,
    },
    Video {
        video_url: String,
        caption: String,
    },
}

impl BlockContent {
    /// The discriminator for this body.
    pub fn block_type(&self) -> BlockType {
        match self {
            BlockContent::Hero { .. } => BlockType::Hero,
            BlockContent::Text { .. } => BlockType::Text,
            BlockContent::Features { .. } => BlockType::Features,
            BlockContent::Benefits { .. } => BlockType::Benefits,
            BlockContent::Specifications { .. } => BlockType::Specifications,
            BlockContent::Image { .. } => BlockType::Image,
            BlockContent::Gallery { .. } => BlockType::Gallery,
            BlockContent::ImageText { .. } => BlockType::ImageText,
            BlockContent::TextImage { .. } => BlockType::TextImage,
            BlockContent::Faq { .. } => BlockType::Faq,
            BlockContent::Cta { .. } => BlockType::Cta,
            BlockContent::Video { .. } => BlockType::Video,
        }
    }
}

// ---------------------------------------------------------------------------
// List items
// ---------------------------------------------------------------------------

/// A single feature or benefit card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub icon: String,
}

/// A name/value row of a specifications table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecItem {
    pub id: Uuid,
    pub name: String,
    pub value: String,
}

/// One image of a gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: Uuid,
    pub src: String,
    pub alt: String,
    pub caption: String,
}

/// A question/answer pair. The answer is sanitized HTML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqItem {
    pub id: Uuid,
    pub question: String,
    pub answer: String,
}
