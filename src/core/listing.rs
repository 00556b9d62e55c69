//! The listing orchestrator.
//!
//! One [Listing::run] call is one `ls` invocation:
//! classify the arguments, render the explicit files, then expand each directory section.
//! The flow never loops back. Any error ends the run at once; whatever was already
//! rendered is flushed by the [Renderer] guard on the way out.

use crate::core::classify::{ArgumentClassifier, PathArgument};
use crate::core::formatter::EntryFilter;
use crate::core::pager::{BATCH_SIZE, DirectoryPager};
use crate::core::render::{RenderOptions, Renderer};
use crate::error::Result;
use crate::remote::RemoteFileSystemClient;
use crate::utils::{join_path, parent_path};

use chrono::{DateTime, Local};

use std::io::Write;

/// Options of one invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Show hidden entries and the synthetic "." and "..".
    pub all: bool,
    pub render: RenderOptions,
}

pub struct Listing<'a> {
    client: &'a dyn RemoteFileSystemClient,
    home: &'a str,
    options: ListOptions,
    batch_size: usize,
}

impl<'a> Listing<'a> {
    pub fn new(
        client: &'a dyn RemoteFileSystemClient,
        home: &'a str,
        options: ListOptions,
    ) -> Self {
        Self {
            client,
            home,
            options,
            batch_size: BATCH_SIZE,
        }
    }

    /// Overrides the directory batch size. Output does not depend on it.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Lists `args` into `out`. `now` decides whether dates show a time or a year.
    pub fn run<W: Write>(
        &self,
        args: Vec<PathArgument>,
        out: W,
        now: DateTime<Local>,
    ) -> Result<()> {
        let classified = ArgumentClassifier::new(self.client, self.home).classify(args)?;

        let mut renderer = Renderer::new(out, self.options.render, now);
        renderer.begin()?;

        for (arg, record) in &classified.files {
            renderer.entry(arg.display(), arg.path(), record)?;
        }
        renderer.end_block()?;

        // A lone directory argument lists like its contents were asked for directly.
        let bare = classified.files.is_empty() && classified.dirs.len() == 1;
        for dir in &classified.dirs {
            if !bare {
                renderer.section_header(dir.display())?;
            }
            self.render_directory(&mut renderer, dir)?;
            renderer.end_block()?;
        }

        renderer.finish()?;
        Ok(())
    }

    fn render_directory<W: Write>(
        &self,
        renderer: &mut Renderer<W>,
        dir: &PathArgument,
    ) -> Result<()> {
        let filter = EntryFilter::new(self.options.all);
        let pager = DirectoryPager::with_batch_size(self.client, dir.path(), self.batch_size)?;

        if filter.show_synthetic(self.options.render.json) {
            let own = self.client.stat(dir.path())?;
            let parent = parent_path(dir.path());
            let parent_record = self.client.stat(&parent)?;
            renderer.entry(".", dir.path(), &own)?;
            renderer.entry("..", &parent, &parent_record)?;
        }

        let mut shown = 0usize;
        for batch in pager {
            let mut batch = batch?;
            filter.filter_entries(&mut batch);
            for entry in &batch {
                renderer.entry(entry.name(), &join_path(dir.path(), entry.name()), entry)?;
            }
            shown += batch.len();
        }
        log::debug!("{}: {} entries shown", dir.path(), shown);
        Ok(())
    }
}
