//! End-to-end mapping of a code-gen archive through the extraction cache

use std::io::Write;
use std::path::{Path, PathBuf};

use tracelink_simulink::{analyze_codegen_archive, SimulinkError};

const GENERATED_C: &str = "\
/* Model step function */
void coder_step(void)
{
  real_T rtb_K;

  /* Gain: '<S1>/K' incorporates:
   *  Inport: '<Root>/In1'
   */
  rtb_K = coder_U.In1 * 2.5;

  /* Outport: '<Root>/Out1' */
  coder_Y.Out1 = rtb_K;
}
";

fn write_slxc(dir: &Path) -> PathBuf {
    let path = dir.join("coder.slxc");
    let file = std::fs::File::create(&path).unwrap();
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    writer
        .start_file("R2025b/coder_ert_rtw/coder.c", options)
        .unwrap();
    writer.write_all(GENERATED_C.as_bytes()).unwrap();
    writer.start_file("R2025b/coder_ert_rtw/coder.h", options).unwrap();
    writer.write_all(b"/* header */").unwrap();
    writer.finish().unwrap();
    path
}

#[test]
fn maps_generated_sources_back_to_blocks() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_slxc(dir.path());

    let doc = analyze_codegen_archive(&archive).unwrap();

    assert_eq!(doc.c_files, vec!["R2025b/coder_ert_rtw/coder.c"]);
    assert_eq!(doc.mappings.len(), 3);

    let gain = doc
        .mappings
        .iter()
        .find(|m| m.block_path == "<S1>/K")
        .unwrap();
    assert_eq!(gain.block_name, "K");
    assert_eq!(gain.code_references.len(), 1);
    assert_eq!(gain.code_references[0].line, 6);
}

#[test]
fn reanalysis_reuses_the_extraction_cache() {
    let dir = tempfile::tempdir().unwrap();
    let archive = write_slxc(dir.path());

    let first = analyze_codegen_archive(&archive).unwrap();
    // The cache directory now exists next to the archive
    assert!(dir.path().join("coder_extracted").is_dir());
    let second = analyze_codegen_archive(&archive).unwrap();

    assert_eq!(first, second);
}

#[test]
fn missing_archive_is_an_archive_error() {
    let result = analyze_codegen_archive("/nonexistent/coder.slxc");
    assert!(matches!(result, Err(SimulinkError::Archive(_))));
}
