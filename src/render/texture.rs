//! GPU textures for terrain layers

use std::path::{Path, PathBuf};

use crate::terrain::Texture;

/// An uploaded RGBA8 texture. Dropping it releases the GPU memory.
pub struct GpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
}

impl GpuTexture {
    pub fn from_image(device: &wgpu::Device, queue: &wgpu::Queue, label: &str, image: &image::RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            image.as_raw(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view, width, height }
    }
}

struct CachedTexture {
    /// Resolved source path
    path: PathBuf,
    gpu: Option<GpuTexture>,
}

/// GPU textures kept index-aligned with a patch's texture list.
///
/// Layers whose image could not be loaded hold `None` and are skipped.
#[derive(Default)]
pub struct TextureCache {
    entries: Vec<CachedTexture>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, layer: usize) -> Option<&GpuTexture> {
        self.entries.get(layer).and_then(|e| e.gpu.as_ref())
    }

    /// Match the cache to `textures`, reusing uploads with the same path.
    ///
    /// Relative paths resolve against `base` before matching. Layers that
    /// failed to load are retried. Entries no longer referenced are dropped.
    /// Returns how many images were newly loaded.
    pub fn sync(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        textures: &[Texture],
        base: Option<&Path>,
    ) -> usize {
        let resolved: Vec<PathBuf> = textures.iter().map(|t| t.resolved_path(base)).collect();
        let old_paths: Vec<Option<&Path>> = self
            .entries
            .iter()
            .map(|e| e.gpu.as_ref().map(|_| e.path.as_path()))
            .collect();
        let new_paths: Vec<&Path> = resolved.iter().map(PathBuf::as_path).collect();
        let plan = plan_reuse(&old_paths, &new_paths);

        let mut old: Vec<Option<CachedTexture>> = self.entries.drain(..).map(Some).collect();
        let mut loaded = 0;
        let mut entries = Vec::with_capacity(textures.len());

        for ((texture, path), reuse) in textures.iter().zip(resolved).zip(plan) {
            if let Some(entry) = reuse.and_then(|i| old[i].take()) {
                entries.push(entry);
                continue;
            }
            let gpu = match texture.load_image(base) {
                Ok(image) => {
                    loaded += 1;
                    Some(GpuTexture::from_image(device, queue, &texture.name(), &image))
                }
                Err(e) => {
                    log::warn!("Texture {} unavailable: {}", path.display(), e);
                    None
                }
            };
            entries.push(CachedTexture { path, gpu });
        }

        self.entries = entries;
        loaded
    }

    /// Release every GPU texture
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// For each new path, the index of an unused old entry with the same path.
/// Old entries given as `None` are never reused.
fn plan_reuse(old: &[Option<&Path>], new: &[&Path]) -> Vec<Option<usize>> {
    let mut used = vec![false; old.len()];
    new.iter()
        .map(|path| {
            let found = old
                .iter()
                .enumerate()
                .position(|(i, p)| !used[i] && *p == Some(*path));
            if let Some(i) = found {
                used[i] = true;
            }
            found
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_reuse_after_reorder() {
        let old = [Some(Path::new("a.png")), Some(Path::new("b.png")), Some(Path::new("c.png"))];
        let new = [Path::new("c.png"), Path::new("a.png"), Path::new("d.png")];
        assert_eq!(plan_reuse(&old, &new), vec![Some(2), Some(0), None]);
    }

    #[test]
    fn test_plan_reuse_duplicates() {
        let old = [Some(Path::new("a.png"))];
        let new = [Path::new("a.png"), Path::new("a.png")];
        assert_eq!(plan_reuse(&old, &new), vec![Some(0), None]);
    }

    #[test]
    fn test_plan_reuse_skips_failed_loads() {
        let old = [None, Some(Path::new("b.png"))];
        let new = [Path::new("a.png"), Path::new("b.png")];
        assert_eq!(plan_reuse(&old, &new), vec![None, Some(1)]);
    }

    #[test]
    fn test_plan_reuse_after_base_change() {
        let texture = Texture::new("grass.png");
        let before = texture.resolved_path(Some(Path::new("old_project")));
        let after = texture.resolved_path(Some(Path::new("new_project")));
        assert_eq!(plan_reuse(&[Some(before.as_path())], &[after.as_path()]), vec![None]);
        assert_eq!(plan_reuse(&[Some(before.as_path())], &[before.as_path()]), vec![Some(0)]);
    }

    #[test]
    fn test_empty_cache() {
        let cache = TextureCache::new();
        assert!(cache.is_empty());
        assert!(cache.get(0).is_none());
    }
}
