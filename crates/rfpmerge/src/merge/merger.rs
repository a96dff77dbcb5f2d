//! Core PDF concatenation.
//!
//! Each source is loaded, its objects are renumbered past everything already
//! collected, and its page ids are appended in file order. Once every source
//! has been consumed a fresh catalog and page tree are built over the
//! collected pages and the result is written in one pass.

use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::path::Path;

use crate::config::{CompressionLevel, ErrorPolicy};
use crate::error::{MergeError, Result};
use crate::io::{DocumentSource, LoadedPdf, PdfReader, PdfWriter};
use crate::merge::job::{DocumentRole, MergeJob};
use crate::merge::report::{MergeReport, MergedDocument, OutputDocument, SkippedDocument};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against cyclic `Parent` chains in malformed files.
const MAX_TREE_DEPTH: usize = 64;

/// Concatenates documents into a single PDF.
#[derive(Debug, Clone)]
pub struct Concatenator {
    reader: PdfReader,
    writer: PdfWriter,
    policy: ErrorPolicy,
    compression: CompressionLevel,
}

impl Concatenator {
    /// Create a concatenator with the given error policy.
    pub fn new(policy: ErrorPolicy) -> Self {
        Self {
            reader: PdfReader::new(),
            writer: PdfWriter::new(),
            policy,
            compression: CompressionLevel::Standard,
        }
    }

    /// Set the compression level of the output.
    pub fn with_compression(mut self, compression: CompressionLevel) -> Self {
        self.compression = compression;
        self
    }

    /// Concatenate `documents` in order and write the result to `output_path`.
    ///
    /// # Errors
    ///
    /// - `NoFilesToMerge` if `documents` is empty, or if every document was
    ///   skipped
    /// - The load error of the first unreadable document under
    ///   [`ErrorPolicy::Abort`]
    /// - Any error creating or writing the output
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rfpmerge::config::ErrorPolicy;
    /// use rfpmerge::io::DocumentSource;
    /// use rfpmerge::merge::Concatenator;
    /// use std::path::Path;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let output = Concatenator::new(ErrorPolicy::SkipFailed)
    ///     .concatenate(
    ///         vec![
    ///             DocumentSource::from_path("part-1.pdf"),
    ///             DocumentSource::from_path("part-2.pdf"),
    ///         ],
    ///         Path::new("merged_folder/combined.pdf"),
    ///     )
    ///     .await?;
    /// println!("{} pages", output.page_count);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn concatenate(
        &self,
        documents: Vec<DocumentSource>,
        output_path: &Path,
    ) -> Result<OutputDocument> {
        let sources = documents.into_iter().map(|source| (None, source)).collect();
        self.concatenate_sources(sources, output_path).await
    }

    /// Run a [`MergeJob`]: RFPs, optional divider, then the response.
    pub async fn run(&self, job: MergeJob) -> Result<OutputDocument> {
        let (sources, output_path) = job.into_sources()?;
        let sources = sources
            .into_iter()
            .map(|(role, source)| (Some(role), source))
            .collect();
        self.concatenate_sources(sources, &output_path).await
    }

    /// Concatenate `documents` in memory without writing anything.
    pub async fn assemble(&self, documents: Vec<DocumentSource>) -> Result<(Document, MergeReport)> {
        let sources = documents.into_iter().map(|source| (None, source)).collect();
        self.assemble_sources(sources).await
    }

    async fn concatenate_sources(
        &self,
        sources: Vec<(Option<DocumentRole>, DocumentSource)>,
        output_path: &Path,
    ) -> Result<OutputDocument> {
        let (document, report) = self.assemble_sources(sources).await?;
        let page_count = report.total_pages();

        let stats = self.writer.save_with_stats(document, output_path).await?;

        Ok(OutputDocument {
            path: stats.output_path,
            page_count,
            file_size: stats.file_size,
            report,
        })
    }

    async fn assemble_sources(
        &self,
        sources: Vec<(Option<DocumentRole>, DocumentSource)>,
    ) -> Result<(Document, MergeReport)> {
        if sources.is_empty() {
            return Err(MergeError::NoFilesToMerge);
        }

        let mut pages = PageCollector::new();
        let mut report = MergeReport::default();

        for (role, source) in sources {
            let label = source.label.clone();

            match self.reader.load(source).await {
                Ok(loaded) => {
                    tracing::info!(label = %loaded.label, pages = loaded.page_count, "Appending document");
                    let first_page = pages.len();
                    let page_count = pages.append(loaded)?;
                    report.merged.push(MergedDocument {
                        label,
                        role,
                        first_page,
                        page_count,
                    });
                }
                Err(err) if self.policy.skips_failures() && err.is_recoverable() => {
                    tracing::warn!(label = %label, error = %err, "Skipping unreadable document");
                    report.skipped.push(SkippedDocument {
                        label,
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        if pages.is_empty() {
            return Err(MergeError::NoFilesToMerge);
        }

        let mut document = pages.finish()?;
        self.apply_compression(&mut document);

        Ok((document, report))
    }

    fn apply_compression(&self, document: &mut Document) {
        match self.compression {
            CompressionLevel::None => {}
            CompressionLevel::Standard => document.compress(),
            CompressionLevel::Maximum => {
                document.compress();
                document.renumber_objects();
            }
        }
    }
}

impl Default for Concatenator {
    fn default() -> Self {
        Self::new(ErrorPolicy::Abort)
    }
}

/// Accumulates pages and objects from successive source documents.
struct PageCollector {
    objects: BTreeMap<ObjectId, Object>,
    page_ids: Vec<ObjectId>,
    next_id: u32,
}

impl PageCollector {
    fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            page_ids: Vec::new(),
            next_id: 1,
        }
    }

    fn len(&self) -> usize {
        self.page_ids.len()
    }

    fn is_empty(&self) -> bool {
        self.page_ids.is_empty()
    }

    /// Append every page of `loaded`, in file order. Returns the page count.
    fn append(&mut self, loaded: LoadedPdf) -> Result<usize> {
        let mut doc = loaded.document;
        doc.renumber_objects_with(self.next_id);
        self.next_id = doc.max_id + 1;

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        for &page_id in &page_ids {
            flatten_inherited_attributes(&mut doc, page_id)?;
        }

        let count = page_ids.len();
        self.page_ids.extend(page_ids);
        self.objects.extend(doc.objects);
        Ok(count)
    }

    /// Build the output document: a new catalog and a flat page tree.
    fn finish(self) -> Result<Document> {
        let mut merged = Document::with_version("1.5");
        merged.objects.extend(self.objects);
        merged.max_id = self.next_id - 1;

        let pages_id = merged.new_object_id();
        let kids: Vec<Object> = self
            .page_ids
            .iter()
            .map(|&id| Object::Reference(id))
            .collect();

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Count", Object::Integer(self.page_ids.len() as i64));
        pages.set("Kids", Object::Array(kids));
        merged.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = merged.new_object_id();
        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        merged.objects.insert(catalog_id, Object::Dictionary(catalog));
        merged.trailer.set("Root", Object::Reference(catalog_id));

        for &page_id in &self.page_ids {
            let page = merged
                .get_dictionary_mut(page_id)
                .map_err(|e| MergeError::other(format!("Page {page_id:?} missing: {e}")))?;
            page.set("Parent", Object::Reference(pages_id));
        }

        // Source catalogs and page-tree nodes are now unreachable.
        merged.prune_objects();

        Ok(merged)
    }
}

/// Copy inheritable attributes from a page's ancestors onto the page itself,
/// so the page renders the same once it hangs off a different parent.
fn flatten_inherited_attributes(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let page = doc.get_dictionary(page_id)?;

    let mut missing: Vec<&[u8]> = INHERITABLE_KEYS
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();
    let mut parent = page.get(b"Parent").and_then(|p| p.as_reference()).ok();
    let mut inherited: Vec<(&[u8], Object)> = Vec::new();
    let mut depth = 0;

    while let Some(parent_id) = parent {
        if missing.is_empty() || depth >= MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };

        missing.retain(|&key| match node.get(key) {
            Ok(value) => {
                inherited.push((key, value.clone()));
                false
            }
            Err(_) => true,
        });

        parent = node.get(b"Parent").and_then(|p| p.as_reference()).ok();
        depth += 1;
    }

    if inherited.is_empty() {
        return Ok(());
    }

    let page = doc.get_dictionary_mut(page_id)?;
    for (key, value) in inherited {
        page.set(key.to_vec(), value);
    }

    Ok(())
}
