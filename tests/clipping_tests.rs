// Post-processing pipelines: soft-clipping, clip attachment, compaction.

use pyroalign::{AlignMode, Aligner};

fn q40(len: usize) -> Vec<u8> {
    vec![b'I'; len]
}

#[test]
fn softclip_replaces_leading_mismatch() {
    // TCGT against AAAACGTAA aligns as 1X 3=; the mismatch folds into a
    // soft clip and the alignment start advances past the consumed base.
    let mut al = Aligner::with_defaults();
    al.prepare(b"AAAACGTAA", b"TCGT", &q40(4), 0, 0).unwrap();
    al.align(AlignMode::SemiGlobal).unwrap();
    al.trace().unwrap();
    assert_eq!(al.show_cigar(), "1X 3=");
    assert_eq!(al.offset(), 3);

    al.softclip_trace();
    assert_eq!(al.show_cigar(), "1S 3=");
    assert_eq!(al.offset(), 4);
}

#[test]
fn softclip_replaces_trailing_insertion() {
    // CGTTT against AAAACGT: CGT matches, the unplaceable TT hangs off the
    // reference end as an insertion and is clipped without moving offset.
    let mut al = Aligner::with_defaults();
    al.prepare(b"AAAACGT", b"CGTTT", &q40(5), 0, 0).unwrap();
    al.align(AlignMode::SemiGlobal).unwrap();
    al.trace().unwrap();
    assert_eq!(al.show_cigar(), "3= 2I");
    let offset_before = al.offset();

    al.softclip_trace();
    assert_eq!(al.show_cigar(), "3= 2S");
    assert_eq!(al.offset(), offset_before);
}

#[test]
fn append_softclip_prepends_head_window() {
    // The first two query bases were clipped before alignment and have no
    // counterpart before the alignment start, so they attach as a clip.
    let mut al = Aligner::with_defaults();
    al.prepare_ref(b"ACGT", 0, 0).unwrap();
    al.prepare_query(b"TTACGT", &q40(6), 2, 0).unwrap();
    al.align(AlignMode::Global).unwrap();
    al.trace().unwrap();
    assert_eq!(al.show_cigar(), "4=");

    al.append_softclip();
    assert_eq!(al.show_cigar(), "2S 4=");
    assert_eq!(al.offset(), 0);
}

#[test]
fn append_softclip_contracts_into_matching_prefix() {
    // The clipped prefix TT re-matches the reference bases immediately
    // before the alignment, so the clip dissolves into the match run.
    let mut al = Aligner::with_defaults();
    al.prepare_ref(b"TTACGT", 0, 0).unwrap();
    al.prepare_query(b"TTACGT", &q40(6), 2, 0).unwrap();
    al.align(AlignMode::SemiGlobal).unwrap();
    al.trace().unwrap();
    assert_eq!(al.show_cigar(), "4=");
    assert_eq!(al.offset(), 2);

    al.append_softclip();
    assert_eq!(al.show_cigar(), "6=");
    assert_eq!(al.offset(), 0);
}

#[test]
fn append_softclip_partial_contraction() {
    let mut al = Aligner::with_defaults();
    al.prepare_ref(b"ATACGT", 0, 0).unwrap();
    al.prepare_query(b"TTACGT", &q40(6), 2, 0).unwrap();
    al.align(AlignMode::SemiGlobal).unwrap();
    al.trace().unwrap();
    assert_eq!(al.show_cigar(), "4=");
    assert_eq!(al.offset(), 2);

    al.append_softclip();
    assert_eq!(al.show_cigar(), "1S 5=");
    assert_eq!(al.offset(), 1);
}

#[test]
fn append_softclip_extends_existing_tail_clip() {
    // GTTT: GT matches the reference end, the first trailing T folds into
    // a soft clip, and the externally clipped final T extends it.
    let mut al = Aligner::with_defaults();
    al.prepare_ref(b"AAGT", 0, 0).unwrap();
    al.prepare_query(b"GTTT", &q40(4), 0, 1).unwrap();
    al.align(AlignMode::SemiGlobal).unwrap();
    al.trace().unwrap();
    al.softclip_trace();
    assert_eq!(al.show_cigar(), "2= 1S");

    al.append_softclip();
    assert_eq!(al.show_cigar(), "2= 2S");
}

#[test]
fn append_softclip_contracts_tail_into_reference_tail() {
    // The reference window was tail-clipped, so the clipped query suffix
    // can re-match the reference bases just past the window.
    let mut al = Aligner::with_defaults();
    al.prepare_ref(b"ACGTTT", 0, 2).unwrap();
    al.prepare_query(b"ACGTTT", &q40(6), 0, 2).unwrap();
    al.align(AlignMode::Global).unwrap();
    al.trace().unwrap();
    assert_eq!(al.show_cigar(), "4=");

    al.append_softclip();
    assert_eq!(al.show_cigar(), "6=");
    assert_eq!(al.offset(), 0);
}

#[test]
fn compact_collapses_substitution_alignment() {
    let mut al = Aligner::with_defaults();
    al.prepare(b"ACGT", b"AGGT", &q40(4), 0, 0).unwrap();
    al.align(AlignMode::Global).unwrap();
    al.trace().unwrap();
    assert_eq!(al.show_cigar(), "1= 1X 2=");

    al.compact_trace();
    assert_eq!(al.show_cigar(), "4M");
}

#[test]
fn typical_pipeline_composition() {
    // trace → softclip → append_softclip → compact, as a caller would run
    // it for SAM output.
    let mut al = Aligner::with_defaults();
    al.prepare_ref(b"AAAACGTAA", 0, 0).unwrap();
    al.prepare_query(b"GGTCGT", &q40(6), 2, 0).unwrap();
    al.align(AlignMode::SemiGlobal).unwrap();
    al.trace().unwrap();
    assert_eq!(al.show_cigar(), "1X 3=");

    al.softclip_trace();
    assert_eq!(al.show_cigar(), "1S 3=");

    al.append_softclip();
    assert_eq!(al.show_cigar(), "3S 3=");

    al.compact_trace();
    assert_eq!(al.show_cigar(), "3S 3M");

    al.append_hardclip(5, 0);
    assert_eq!(al.show_cigar(), "5H 3S 3M");

    // Window CGT sits at reference position 4; GG and the folded T are
    // query-only and do not shift the start.
    assert_eq!(al.offset(), 4);
    assert_eq!(al.alignment_start(0), 4);
}

#[test]
fn softclip_then_hardclip_leaves_clip_order_intact() {
    let mut al = Aligner::with_defaults();
    al.prepare(b"AAAACGTAA", b"TCGT", &q40(4), 0, 0).unwrap();
    al.align(AlignMode::SemiGlobal).unwrap();
    al.trace().unwrap();
    al.softclip_trace();
    al.append_hardclip(2, 3);
    assert_eq!(al.show_cigar(), "2H 1S 3= 3H");
}
