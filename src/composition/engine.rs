use std::fs::{self, create_dir_all};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{
    assign::{discover_images, CachedMapping, ImageAssigner, MappingOrigin, MappingStore},
    composition::types::{BuildReport, FallbackReason, ImageChoice, SceneOutcome, ScenePlan},
    config::Config,
    error::{InputError, Result},
    frame::FrameComposer,
    render::{SceneRenderer, StillClipRequest, ZoomSpec},
    script::{parse_script, types::scene_pairs, Video},
    timing::DurationEstimator,
};

/// Validated inputs plus the mapping they resolve against
struct PreparedInputs {
    videos: Vec<Video>,
    images: Vec<PathBuf>,
    mapping: CachedMapping,
}

/// Main engine that turns a narration script and an image folder into one video
///
/// The engine follows a clear pipeline:
/// 1. Input Validation - Script and images directory exist, at least one image
/// 2. Script Parsing - Videos and scenes in document order
/// 3. Image Mapping - Load the stored mapping or compute and store a new one
/// 4. Scene Building - Compose a captioned frame and render a clip per scene
/// 5. Concatenation - Join every clip into the final output
pub struct SlideshowEngine {
    config: Config,
    store: Box<dyn MappingStore>,
    renderer: Box<dyn SceneRenderer>,
    composer: FrameComposer,
}

impl SlideshowEngine {
    /// Create an engine; the caption font is picked from the frame configuration
    pub fn new(config: Config, store: Box<dyn MappingStore>, renderer: Box<dyn SceneRenderer>) -> Self {
        let composer = FrameComposer::new(config.frame.clone());
        Self::with_composer(config, store, renderer, composer)
    }

    pub fn with_composer(
        config: Config,
        store: Box<dyn MappingStore>,
        renderer: Box<dyn SceneRenderer>,
        composer: FrameComposer,
    ) -> Self {
        Self {
            config,
            store,
            renderer,
            composer,
        }
    }

    /// Run the whole build and return what was produced
    pub fn run(&mut self) -> Result<BuildReport> {
        let paths = self.config.paths.clone();

        info!("🎬 Starting course slideshow build");
        info!("   Script: {:?}", paths.script);
        info!("   Images: {:?}", paths.images_dir);
        info!("   Build: {:?}", paths.build_dir);
        info!("   Output: {:?}", paths.output);
        info!("   Renderer: {}", self.renderer.name());

        // Pipeline Steps 1-3: Inputs and mapping
        let prepared = self.prepare(true)?;
        let plans = self.plan_scenes(&prepared);

        // Pipeline Step 4: Frames and clips
        let scenes = self.build_scenes(plans)?;

        // Pipeline Step 5: Final output
        let output = self.concatenate(&scenes, &paths.output)?;

        let report = BuildReport {
            output,
            mapping_origin: prepared.mapping.origin,
            scenes,
        };

        info!(
            "🎉 Build complete! {} scenes, {:.1}s total, saved to: {:?}",
            report.scenes.len(),
            report.total_duration(),
            report.output
        );
        if report.fallback_count() > 0 {
            warn!("{} scenes used the fallback image", report.fallback_count());
        }

        Ok(report)
    }

    /// Resolve durations and images for every scene without drawing or encoding
    ///
    /// An existing mapping is used as is; otherwise one is computed but not stored.
    pub fn plan(&mut self) -> Result<Vec<ScenePlan>> {
        let prepared = self.prepare(false)?;
        Ok(self.plan_scenes(&prepared))
    }

    fn prepare(&mut self, persist: bool) -> Result<PreparedInputs> {
        self.config.validate()?;
        let images = self.validate_inputs()?;
        let videos = self.parse_script()?;
        let mapping = self.resolve_mapping(&videos, &images, persist)?;

        Ok(PreparedInputs {
            videos,
            images,
            mapping,
        })
    }

    // ==========================================
    // PIPELINE STEP 1: INPUT VALIDATION
    // ==========================================

    /// Check both inputs exist and return the sorted image list
    fn validate_inputs(&self) -> Result<Vec<PathBuf>> {
        info!("🔍 Step 1: Validating inputs...");
        let paths = &self.config.paths;

        if !paths.script.is_file() {
            return Err(InputError::ScriptNotFound {
                path: paths.script.display().to_string(),
            }
            .into());
        }

        if !paths.images_dir.is_dir() {
            return Err(InputError::ImageDirNotFound {
                path: paths.images_dir.display().to_string(),
            }
            .into());
        }

        let images = discover_images(&paths.images_dir)?;
        if images.is_empty() {
            return Err(InputError::NoImages {
                path: paths.images_dir.display().to_string(),
            }
            .into());
        }

        info!("   Found {} images", images.len());
        Ok(images)
    }

    // ==========================================
    // PIPELINE STEP 2: SCRIPT PARSING
    // ==========================================

    fn parse_script(&self) -> Result<Vec<Video>> {
        info!("📝 Step 2: Parsing script...");

        let text = fs::read_to_string(&self.config.paths.script)?;
        let videos = parse_script(&text);

        let scene_count: usize = videos.iter().map(|video| video.scenes.len()).sum();
        info!("   Parsed {} videos with {} scenes", videos.len(), scene_count);
        for video in &videos {
            debug!("   Video {}: {} ({} scenes)", video.video_number, video.title, video.scenes.len());
        }

        if scene_count == 0 {
            warn!("Script contains no scenes");
        }

        Ok(videos)
    }

    // ==========================================
    // PIPELINE STEP 3: IMAGE MAPPING
    // ==========================================

    fn resolve_mapping(&mut self, videos: &[Video], images: &[PathBuf], persist: bool) -> Result<CachedMapping> {
        info!("🗺️  Step 3: Resolving image mapping from {}...", self.store.describe());

        let assigner = ImageAssigner::new(&self.config.assignment)?;

        if persist {
            return self
                .store
                .load_or_compute(&mut || assigner.assign(videos, images));
        }

        match self.store.load()? {
            Some(mapping) => Ok(CachedMapping {
                mapping,
                origin: MappingOrigin::Loaded,
            }),
            None => {
                info!("   No stored mapping; computing a preview without saving it");
                Ok(CachedMapping {
                    mapping: assigner.assign(videos, images),
                    origin: MappingOrigin::Computed,
                })
            }
        }
    }

    fn plan_scenes(&self, prepared: &PreparedInputs) -> Vec<ScenePlan> {
        let estimator = DurationEstimator::new(&self.config.timing);
        // Non-empty: validate_inputs rejects an empty image set
        let fallback = &prepared.images[0];

        scene_pairs(&prepared.videos)
            .map(|(video, scene)| {
                let key = video.key_for(scene);
                let image = ImageChoice::resolve(&prepared.mapping.mapping, &key, fallback);

                match &image {
                    ImageChoice::Fallback {
                        path,
                        reason: FallbackReason::Unmapped,
                    } => warn!("No image mapped for {}; using {}", key, path.display()),
                    ImageChoice::Fallback {
                        path,
                        reason: FallbackReason::MissingFile(missing),
                    } => warn!(
                        "Mapped image {} for {} is missing; using {}",
                        missing.display(),
                        key,
                        path.display()
                    ),
                    ImageChoice::Mapped(_) => {}
                }

                ScenePlan {
                    key,
                    narration: scene.narration.clone(),
                    duration: estimator.estimate(&scene.narration),
                    image,
                }
            })
            .collect()
    }

    // ==========================================
    // PIPELINE STEP 4: SCENE BUILDING
    // ==========================================

    fn build_scenes(&mut self, plans: Vec<ScenePlan>) -> Result<Vec<SceneOutcome>> {
        info!("🎨 Step 4: Building {} scenes...", plans.len());

        let frames_dir = self.config.paths.frames_dir();
        let scenes_dir = self.config.paths.scenes_dir();
        create_dir_all(&frames_dir)?;
        create_dir_all(&scenes_dir)?;

        let zoom = ZoomSpec::from_config(&self.config.encode);
        let mut outcomes = Vec::with_capacity(plans.len());

        for plan in plans {
            let frame_path = frames_dir.join(plan.key.file_name("png"));
            debug!("Composing {} from {}", plan.key, plan.image.path().display());
            self.composer
                .compose_to_file(plan.image.path(), &plan.narration, &frame_path)?;

            let request = StillClipRequest {
                key: plan.key,
                frame_path: frame_path.clone(),
                duration: plan.duration,
                zoom,
                clip_path: scenes_dir.join(plan.key.file_name("mp4")),
            };
            let clip = self.renderer.render_still(&request)?;
            info!("   ✅ {} ({:.2}s)", plan.key, plan.duration);

            outcomes.push(SceneOutcome {
                plan,
                frame_path,
                clip,
            });
        }

        Ok(outcomes)
    }

    // ==========================================
    // PIPELINE STEP 5: CONCATENATION
    // ==========================================

    fn concatenate(&mut self, scenes: &[SceneOutcome], output: &Path) -> Result<PathBuf> {
        info!("🔗 Step 5: Concatenating {} clips...", scenes.len());

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                create_dir_all(parent)?;
            }
        }

        let clips: Vec<_> = scenes.iter().map(|scene| scene.clip.clone()).collect();
        let handle = self.renderer.concatenate(&clips, output)?;
        Ok(handle.path)
    }
}
