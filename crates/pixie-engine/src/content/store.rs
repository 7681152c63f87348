use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::coords::Rect;
use crate::render::RenderCtx;
use crate::render::sprite::{Texture, TextureStore};

use super::atlas::{AtlasRegion, parse_atlas};
use super::sprite::Sprite;

/// Named textures and sprites for one application.
///
/// Built by the application root and passed to whatever needs to look
/// content up. GPU resources stay in the [`TextureStore`].
#[derive(Debug, Default)]
pub struct ContentStore {
    textures: HashMap<String, Texture>,
    sprites: HashMap<String, Sprite>,
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a texture, replacing any previous one with the same name.
    pub fn insert_texture(&mut self, name: impl Into<String>, texture: Texture) {
        self.textures.insert(name.into(), texture);
    }

    pub fn texture(&self, name: &str) -> Option<Texture> {
        self.textures.get(name).copied()
    }

    pub fn insert_sprite(&mut self, name: impl Into<String>, sprite: Sprite) {
        self.sprites.insert(name.into(), sprite);
    }

    pub fn sprite(&self, name: &str) -> Option<&Sprite> {
        self.sprites.get(name)
    }

    pub fn sprite_mut(&mut self, name: &str) -> Option<&mut Sprite> {
        self.sprites.get_mut(name)
    }

    /// Sprite names in lexicographic order.
    pub fn sprite_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sprites.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len()
    }

    /// Decodes `path` into `textures` and registers it under `name`.
    pub fn load_texture(
        &mut self,
        ctx: &RenderCtx<'_>,
        textures: &mut TextureStore,
        name: impl Into<String>,
        path: impl AsRef<Path>,
    ) -> Result<Texture> {
        let texture = textures.load(ctx, path)?;
        self.insert_texture(name, texture);
        Ok(texture)
    }

    /// Loads a sheet image plus its XML atlas and registers one sprite per region.
    ///
    /// The sheet texture is registered under the image's file stem.
    pub fn load_sprite_sheet(
        &mut self,
        ctx: &RenderCtx<'_>,
        textures: &mut TextureStore,
        image_path: impl AsRef<Path>,
        atlas_path: impl AsRef<Path>,
    ) -> Result<Texture> {
        let image_path = image_path.as_ref();
        let atlas_path = atlas_path.as_ref();

        let sheet = textures.load(ctx, image_path)?;
        let xml = std::fs::read_to_string(atlas_path)
            .with_context(|| format!("failed to read atlas {}", atlas_path.display()))?;
        let regions = parse_atlas(&xml)
            .with_context(|| format!("failed to parse atlas {}", atlas_path.display()))?;

        let stem = image_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| image_path.display().to_string());
        self.insert_texture(stem, sheet);

        let added = self.add_atlas(sheet, &regions);
        log::debug!("sprite sheet {}: {added} sprites", image_path.display());
        Ok(sheet)
    }

    /// Registers one sprite per region, drawn at the origin at native size.
    pub fn add_atlas(&mut self, sheet: Texture, regions: &[AtlasRegion]) -> usize {
        for region in regions {
            let src = region.source;
            let sprite = Sprite::new(sheet, Rect::from_size(src.width, src.height), src);
            self.insert_sprite(region.name.clone(), sprite);
        }
        regions.len()
    }
}
