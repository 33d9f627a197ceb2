use std::io::{self, Cursor, Read, Seek};

use tracing::{debug, info};
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::RepackError;
use crate::plan::{plan, EntryMeta};
use crate::policy::{DropReason, SelectionPolicy, Verdict};

/// What a repackaging pass kept and dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepackReport {
    pub master: Option<String>,
    pub kept: Vec<String>,
    pub dropped: Vec<(String, DropReason)>,
}

#[derive(Debug, Clone)]
pub struct Repackaged {
    pub bytes: Vec<u8>,
    pub report: RepackReport,
}

/// Rebuilds APK Set archives according to a [`SelectionPolicy`].
#[derive(Debug, Clone, Default)]
pub struct Repackager {
    policy: SelectionPolicy,
}

/// Repackages `input` with the default policy and returns the new archive.
pub fn repackage(input: &[u8]) -> Result<Vec<u8>, RepackError> {
    Repackager::default().repackage(input).map(|r| r.bytes)
}

impl Repackager {
    pub fn new(policy: SelectionPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &SelectionPolicy {
        &self.policy
    }

    pub fn repackage(&self, input: &[u8]) -> Result<Repackaged, RepackError> {
        let mut archive =
            ZipArchive::new(Cursor::new(input)).map_err(RepackError::InvalidArchive)?;

        let entries = read_entry_metadata(&mut archive)?;
        let plan = plan(&entries, &self.policy);
        if let Some(master) = &plan.master {
            info!(
                "Selected master split {} ({} candidates)",
                master,
                plan.candidates.len()
            );
        } else {
            debug!("No master split candidates found");
        }

        let mut writer = ZipWriter::new(Cursor::new(Vec::with_capacity(input.len())));
        let mut report = RepackReport {
            master: plan.master.clone(),
            ..RepackReport::default()
        };

        for (index, (name, verdict)) in plan.verdicts.iter().enumerate() {
            match verdict {
                Verdict::Keep(reason) => {
                    debug!("keep {} ({:?})", name, reason);
                    verify_payload(&mut archive, index, name)?;
                    let raw = archive
                        .by_index_raw(index)
                        .map_err(|e| RepackError::processing(name, e))?;
                    writer
                        .raw_copy_file(raw)
                        .map_err(|e| RepackError::processing(name, e))?;
                    report.kept.push(name.clone());
                }
                Verdict::Drop(reason) => {
                    debug!("drop {} ({:?})", name, reason);
                    report.dropped.push((name.clone(), *reason));
                }
            }
        }

        let bytes = writer
            .finish()
            .map_err(RepackError::Finish)?
            .into_inner();

        info!(
            "Repackaged archive: kept {} of {} entries ({} -> {} bytes)",
            report.kept.len(),
            entries.len(),
            input.len(),
            bytes.len()
        );

        Ok(Repackaged { bytes, report })
    }
}

fn read_entry_metadata<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> Result<Vec<EntryMeta>, RepackError> {
    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let file = archive
            .by_index_raw(index)
            .map_err(|e| RepackError::processing(format!("#{index}"), e))?;
        entries.push(EntryMeta::new(file.name(), file.size()));
    }
    Ok(entries)
}

/// Reads a kept entry through its decompressor so a corrupt payload fails
/// the CRC-32 check instead of being copied into the output.
fn verify_payload<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    index: usize,
    name: &str,
) -> Result<(), RepackError> {
    let method = archive
        .by_index_raw(index)
        .map_err(|e| RepackError::processing(name, e))?
        .compression();
    if !matches!(
        method,
        CompressionMethod::Stored | CompressionMethod::Deflated
    ) {
        debug!("skipping payload check for {} ({:?})", name, method);
        return Ok(());
    }

    let mut file = archive
        .by_index(index)
        .map_err(|e| RepackError::processing(name, e))?;
    io::copy(&mut file, &mut io::sink()).map_err(|e| RepackError::processing(name, e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn build(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
        let mut zw = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            let opts =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            zw.start_file(*name, opts).unwrap();
            zw.write_all(data).unwrap();
        }
        zw.finish().unwrap().into_inner()
    }

    #[test]
    fn report_lists_every_entry_once() {
        let input = build(&[
            ("AndroidManifest.xml", b"<manifest/>".to_vec()),
            ("toc.pb", vec![1, 2, 3]),
            ("splits/base-hdpi.apk", vec![0; 16]),
            ("splits/base-master.apk", vec![0; 16]),
        ]);
        let out = Repackager::default().repackage(&input).unwrap();
        assert_eq!(out.report.master.as_deref(), Some("splits/base-master.apk"));
        assert_eq!(
            out.report.kept,
            vec!["AndroidManifest.xml", "splits/base-master.apk"]
        );
        assert_eq!(
            out.report.dropped,
            vec![
                ("toc.pb".to_string(), DropReason::Metadata),
                ("splits/base-hdpi.apk".to_string(), DropReason::UnselectedSplit),
            ]
        );
    }

    #[test]
    fn garbage_is_an_invalid_archive() {
        let err = repackage(b"definitely not a zip file").unwrap_err();
        assert!(matches!(err, RepackError::InvalidArchive(_)));
        assert!(!err.is_processing());
    }
}
