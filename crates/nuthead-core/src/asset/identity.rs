// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fmt;

/// The on-disk encoding of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetFormat {
    /// A UTF-8 JSON document.
    Json,
    /// A PNG image.
    Image,
}

impl AssetFormat {
    /// The file extension appended to the resource's path.
    pub fn extension(self) -> &'static str {
        match self {
            AssetFormat::Json => "json",
            AssetFormat::Image => "png",
        }
    }

    /// A short, stable name for logs and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            AssetFormat::Json => "json",
            AssetFormat::Image => "image",
        }
    }
}

impl fmt::Display for AssetFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The category of a resource, which is also the directory it lives in
/// under the data root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A map definition or a map's background image.
    Map,
    /// An entity's shared definition or sprite sheet.
    Entity,
    /// Any other directory, for resources the pipeline itself never asks for.
    Custom(String),
}

impl ResourceKind {
    /// The directory name of this kind.
    pub fn as_str(&self) -> &str {
        match self {
            ResourceKind::Map => "map",
            ResourceKind::Entity => "entity",
            ResourceKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four-part identity of a fetchable resource.
///
/// Two identities are equal only if all four parts are equal. In particular an
/// identity without a variant never equals one with a variant, whatever the
/// variant's value. The variant is kept as a separate field rather than being
/// folded into the name, so `flower` with variant `blue` and an entity literally
/// named `flower-blue` remain distinct identities even though they share a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId {
    /// How the resource is encoded.
    pub format: AssetFormat,
    /// What the resource describes.
    pub kind: ResourceKind,
    /// The resource's name within its kind.
    pub name: String,
    /// An optional variant of the named resource.
    pub variant: Option<String>,
}

impl ResourceId {
    /// Creates an identity without a variant.
    pub fn new(format: AssetFormat, kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            format,
            kind,
            name: name.into(),
            variant: None,
        }
    }

    /// Shorthand for a JSON identity without a variant.
    pub fn json(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self::new(AssetFormat::Json, kind, name)
    }

    /// Shorthand for an image identity without a variant.
    pub fn image(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self::new(AssetFormat::Image, kind, name)
    }

    /// Returns the same identity with the given variant.
    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    /// Returns the same identity with the variant replaced by `variant`.
    pub fn with_optional_variant(mut self, variant: Option<String>) -> Self {
        self.variant = variant;
        self
    }

    /// The file name without extension: `name` or `name-variant`.
    pub fn file_stem(&self) -> String {
        match &self.variant {
            Some(variant) => format!("{}-{}", self.name, variant),
            None => self.name.clone(),
        }
    }

    /// The path relative to the data root: `kind/name[-variant].ext`.
    pub fn relative_path(&self) -> String {
        format!(
            "{}/{}.{}",
            self.kind,
            self.file_stem(),
            self.format.extension()
        )
    }

    /// The full source path under an already normalized data root.
    pub fn source_path(&self, data_root: &str) -> String {
        if data_root.is_empty() {
            self.relative_path()
        } else if data_root.ends_with('/') {
            format!("{}{}", data_root, self.relative_path())
        } else {
            format!("{}/{}", data_root, self.relative_path())
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.format, self.kind, self.name)?;
        if let Some(variant) = &self.variant {
            write!(f, "[{variant}]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_presence_is_part_of_identity() {
        let plain = ResourceId::json(ResourceKind::Entity, "flower");
        let blue = plain.clone().with_variant("blue");
        let empty = plain.clone().with_variant("");

        assert_ne!(plain, blue);
        assert_ne!(plain, empty);
        assert_eq!(blue, ResourceId::json(ResourceKind::Entity, "flower").with_variant("blue"));
    }

    #[test]
    fn hyphenated_name_is_not_a_variant() {
        let hyphenated = ResourceId::json(ResourceKind::Entity, "flower-blue");
        let variant = ResourceId::json(ResourceKind::Entity, "flower").with_variant("blue");

        assert_ne!(hyphenated, variant);
        assert_eq!(hyphenated.relative_path(), variant.relative_path());
    }

    #[test]
    fn paths_follow_kind_name_variant_extension() {
        let map = ResourceId::json(ResourceKind::Map, "test");
        assert_eq!(map.relative_path(), "map/test.json");
        assert_eq!(map.source_path("data"), "data/map/test.json");
        assert_eq!(map.source_path(""), "map/test.json");

        let sprite = ResourceId::image(ResourceKind::Entity, "flower").with_variant("blue");
        assert_eq!(
            sprite.source_path("http://cdn.local/"),
            "http://cdn.local/entity/flower-blue.png"
        );
    }

    #[test]
    fn display_keeps_variant_separate() {
        let id = ResourceId::image(ResourceKind::Map, "test").with_variant("night");
        assert_eq!(id.to_string(), "image:map/test[night]");
        assert_eq!(
            ResourceId::json(ResourceKind::Custom("hud".into()), "font").to_string(),
            "json:hud/font"
        );
    }
}
