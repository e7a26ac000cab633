//! Organigram service
//!
//! Runs the whole pipeline for one input file: load, build, lay out, render.
//! Nothing is cached; each call reads the file again.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::application::render::{dendrogram_svg, sunburst_page};
use crate::application::services::roster::parse_roster;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{compute_layout, Hierarchy, HierarchyBuilder, Layout, Person, SunburstData};
use crate::infrastructure::traits::FileSystem;

/// Service for building and rendering organigrams.
pub struct OrganigramService {
    fs: Arc<dyn FileSystem>,
    settings: Arc<Settings>,
}

impl OrganigramService {
    /// Create a new organigram service.
    pub fn new(fs: Arc<dyn FileSystem>, settings: Arc<Settings>) -> Self {
        Self { fs, settings }
    }

    /// Input path to use: explicit argument, else the configured default.
    pub fn input_path(&self, input: Option<&Path>) -> PathBuf {
        input
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.settings.input.path.clone())
    }

    /// Fail with `MissingFile` unless `input` is an existing file.
    pub fn ensure_input(&self, input: &Path) -> ApplicationResult<()> {
        if self.fs.is_file(input) {
            Ok(())
        } else {
            Err(ApplicationError::MissingFile(input.to_path_buf()))
        }
    }

    /// Read and validate all rows of the roster.
    pub fn load(&self, input: &Path) -> ApplicationResult<Vec<Person>> {
        self.ensure_input(input)?;
        let content = self
            .fs
            .read_to_string(input)
            .with_path_context("read input", input)?;
        parse_roster(
            &content,
            input,
            &self.settings.input,
            self.settings.delimiter()?,
        )
    }

    #[instrument(level = "debug", skip(self))]
    pub fn build(&self, input: &Path) -> ApplicationResult<Hierarchy> {
        let people = self.load(input)?;
        let hierarchy =
            HierarchyBuilder::new(self.settings.hierarchy_options()).build(&people)?;
        info!(
            "built hierarchy of {} nodes rooted at {}",
            hierarchy.len(),
            hierarchy.root_name()
        );
        Ok(hierarchy)
    }

    pub fn layout(&self, input: &Path) -> ApplicationResult<(Hierarchy, Layout)> {
        let hierarchy = self.build(input)?;
        let layout = compute_layout(&hierarchy, &self.settings.layout_options());
        debug!("layout kind: {:?}", layout.kind);
        Ok((hierarchy, layout))
    }

    pub fn sunburst(&self, input: &Path) -> ApplicationResult<SunburstData> {
        let hierarchy = self.build(input)?;
        Ok(SunburstData::from_hierarchy(&hierarchy))
    }

    /// HTML page with the sunburst chart of `input`.
    pub fn sunburst_page(&self, input: &Path) -> ApplicationResult<String> {
        let data = self.sunburst(input)?;
        sunburst_page(&data, &self.settings.render)
    }

    pub fn dendrogram_svg(&self, input: &Path) -> ApplicationResult<String> {
        let (hierarchy, layout) = self.layout(input)?;
        Ok(dendrogram_svg(&hierarchy, &layout, &self.settings.render))
    }

    /// Render the dendrogram and write it to `output`.
    pub fn write_dendrogram(&self, input: &Path, output: &Path) -> ApplicationResult<()> {
        let svg = self.dendrogram_svg(input)?;
        self.write_output(output, &svg)
    }

    pub fn write_sunburst_page(&self, input: &Path, output: &Path) -> ApplicationResult<()> {
        let page = self.sunburst_page(input)?;
        self.write_output(output, &page)
    }

    fn write_output(&self, output: &Path, content: &str) -> ApplicationResult<()> {
        self.fs
            .ensure_parent(output)
            .with_path_context("create output directory", output)?;
        self.fs
            .write(output, content)
            .with_path_context("write output", output)?;
        info!("wrote {}", output.display());
        Ok(())
    }
}
