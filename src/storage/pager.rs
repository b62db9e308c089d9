//! # Pager
//!
//! The pager owns the database file and a fixed-capacity cache of page
//! buffers, indexed directly by page number. It is the only component that
//! performs file I/O; it never interprets page contents.
//!
//! ## Caching Model
//!
//! The cache has exactly [`TABLE_MAX_PAGES`] slots, so cache capacity equals
//! file capacity and no eviction ever happens. A page is read from disk at
//! most once per session (on first access) and written back at most once
//! (on close). There is no write-ahead log: a session that ends without
//! [`Pager::close`] loses every mutation made since open.
//!
//! ## Page Lifecycle
//!
//! ```text
//! get(n)  cache miss ──> zeroed buffer ──> read page n if it exists on disk
//!         cache hit  ──> existing buffer
//! unused_page_num()  ──> num_pages (the next fresh page; caller populates
//!                        it through get, which extends num_pages)
//! close() ──> flush every populated slot in [0, num_pages), sync, release
//! ```
//!
//! Pages returned by [`Pager::get`] are borrowed for the duration of one
//! operation step; the borrow checker prevents holding a page across a call
//! that could hand out another buffer.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use eyre::{bail, ensure, Result, WrapErr};
use tracing::debug;

use crate::config::constants::{PAGE_SIZE, TABLE_MAX_PAGES};

/// One fixed-size page buffer.
pub type PageBuf = [u8; PAGE_SIZE];

#[derive(Debug)]
pub struct Pager {
    file: File,
    file_length: u64,
    num_pages: u32,
    pages: Vec<Option<Box<PageBuf>>>,
}

impl Pager {
    /// Opens or creates the database file. The file length must be a whole
    /// multiple of the page size; anything else is treated as corruption.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)
            .wrap_err_with(|| format!("failed to open database file '{}'", path.display()))?;

        let file_length = file
            .metadata()
            .wrap_err_with(|| format!("failed to stat database file '{}'", path.display()))?
            .len();

        ensure!(
            file_length % PAGE_SIZE as u64 == 0,
            "database file '{}' length {} is not a whole number of {}-byte pages; \
             the file is likely corrupted",
            path.display(),
            file_length,
            PAGE_SIZE
        );

        let num_pages = (file_length / PAGE_SIZE as u64) as u32;
        ensure!(
            num_pages as usize <= TABLE_MAX_PAGES,
            "database file '{}' holds {} pages, more than the table maximum {}",
            path.display(),
            num_pages,
            TABLE_MAX_PAGES
        );

        let mut pages = Vec::with_capacity(TABLE_MAX_PAGES);
        pages.resize_with(TABLE_MAX_PAGES, || None);

        Ok(Self {
            file,
            file_length,
            num_pages,
            pages,
        })
    }

    /// Number of pages the table currently spans, counting cached pages that
    /// have not been flushed yet.
    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    /// The next unused page number. The caller is expected to populate the
    /// page immediately via [`Pager::get`].
    pub fn unused_page_num(&self) -> u32 {
        self.num_pages
    }

    /// Returns a mutable view of the page, reading it from disk on first
    /// access if it exists there.
    pub fn get(&mut self, page_num: u32) -> Result<&mut PageBuf> {
        ensure!(
            (page_num as usize) < TABLE_MAX_PAGES,
            "page {} is beyond the table capacity of {} pages",
            page_num,
            TABLE_MAX_PAGES
        );

        let idx = page_num as usize;

        if self.pages[idx].is_none() {
            let mut page = Box::new([0u8; PAGE_SIZE]);

            let pages_on_disk = (self.file_length / PAGE_SIZE as u64) as u32;
            if page_num < pages_on_disk {
                debug!(page = page_num, "page cache miss, reading from file");
                self.file
                    .seek(SeekFrom::Start(page_num as u64 * PAGE_SIZE as u64))
                    .wrap_err_with(|| format!("failed to seek to page {}", page_num))?;
                self.file
                    .read_exact(&mut page[..])
                    .wrap_err_with(|| format!("failed to read page {}", page_num))?;
            }

            self.pages[idx] = Some(page);
            if page_num >= self.num_pages {
                self.num_pages = page_num + 1;
            }
        }

        match self.pages[idx].as_deref_mut() {
            Some(page) => Ok(page),
            None => bail!("page cache slot {} empty after load", page_num),
        }
    }

    /// Writes the full cached buffer for `page_num` back to the file.
    pub fn flush(&mut self, page_num: u32) -> Result<()> {
        ensure!(
            (page_num as usize) < TABLE_MAX_PAGES,
            "page {} is beyond the table capacity of {} pages",
            page_num,
            TABLE_MAX_PAGES
        );

        let Some(page) = self.pages[page_num as usize].as_deref() else {
            bail!("tried to flush page {} which was never loaded", page_num);
        };

        self.file
            .seek(SeekFrom::Start(page_num as u64 * PAGE_SIZE as u64))
            .wrap_err_with(|| format!("failed to seek to page {}", page_num))?;
        self.file
            .write_all(&page[..])
            .wrap_err_with(|| format!("failed to write page {}", page_num))?;

        Ok(())
    }

    /// Flushes every populated page in `[0, num_pages)`, syncs the file, and
    /// releases all cached buffers.
    pub fn close(&mut self) -> Result<()> {
        for page_num in 0..self.num_pages {
            if self.pages[page_num as usize].is_some() {
                self.flush(page_num)?;
                self.pages[page_num as usize] = None;
            }
        }

        self.file
            .sync_all()
            .wrap_err("failed to sync database file")?;

        // Release any stray buffers beyond num_pages as well.
        for slot in &mut self.pages {
            *slot = None;
        }

        debug!(pages = self.num_pages, "pager closed");
        Ok(())
    }
}
