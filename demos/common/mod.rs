//! A small phenotype taxonomy with a handful of annotated diseases

use ontosim::{AnnotationGraph, Taxonomy, TermRecord};

const TERMS: [(&str, &str, &[&str]); 21] = [
    ("PH:0000001", "All", &[]),
    ("PH:0000100", "Abnormality of the cardiovascular system", &["PH:0000001"]),
    ("PH:0000110", "Abnormal heart morphology", &["PH:0000100"]),
    ("PH:0000111", "Abnormal heart valve morphology", &["PH:0000110"]),
    ("PH:0000112", "Mitral valve prolapse", &["PH:0000111"]),
    ("PH:0000113", "Aortic valve stenosis", &["PH:0000111"]),
    ("PH:0000120", "Arrhythmia", &["PH:0000100"]),
    ("PH:0000121", "Atrial fibrillation", &["PH:0000120"]),
    ("PH:0000200", "Abnormality of the skeletal system", &["PH:0000001"]),
    ("PH:0000210", "Abnormal joint mobility", &["PH:0000200"]),
    ("PH:0000211", "Joint hypermobility", &["PH:0000210"]),
    ("PH:0000220", "Abnormal spine morphology", &["PH:0000200"]),
    ("PH:0000221", "Scoliosis", &["PH:0000220"]),
    ("PH:0000300", "Abnormality of the eye", &["PH:0000001"]),
    ("PH:0000310", "Abnormal lens morphology", &["PH:0000300"]),
    ("PH:0000311", "Ectopia lentis", &["PH:0000310"]),
    ("PH:0000320", "Myopia", &["PH:0000300"]),
    ("PH:0000400", "Abnormality of connective tissue", &["PH:0000001"]),
    ("PH:0000410", "Arachnodactyly", &["PH:0000400", "PH:0000200"]),
    ("PH:0000420", "Skin striae", &["PH:0000400"]),
    ("PH:0000430", "Abnormal skin elasticity", &["PH:0000400"]),
];

const DISEASES: [(&str, &str, &[&str]); 8] = [
    (
        "D:01",
        "Marfan-like syndrome",
        &["PH:0000112", "PH:0000311", "PH:0000410", "PH:0000221", "PH:0000420"],
    ),
    ("D:02", "Hypermobility disorder", &["PH:0000211", "PH:0000420", "PH:0000112"]),
    ("D:03", "Isolated mitral valve prolapse", &["PH:0000112"]),
    ("D:04", "Aortic stenosis", &["PH:0000113"]),
    ("D:05", "Lone atrial fibrillation", &["PH:0000121"]),
    ("D:06", "High myopia", &["PH:0000320"]),
    ("D:07", "Idiopathic scoliosis", &["PH:0000221"]),
    ("D:08", "Lens dislocation syndrome", &["PH:0000311", "PH:0000320"]),
];

pub fn taxonomy() -> Taxonomy {
    Taxonomy::load(
        TERMS
            .iter()
            .map(|(id, name, parents)| TermRecord::new(*id, *name).with_parents(parents.iter().copied())),
    )
    .expect("the demo taxonomy is valid")
}

/// The disease annotations, already closure-propagated
pub fn annotations() -> AnnotationGraph {
    let mut annotations = AnnotationGraph::new(taxonomy());
    for (id, name, terms) in DISEASES {
        for term in terms {
            annotations.add_direct_annotation(id, name, term);
        }
    }
    annotations.propagate_closure();
    annotations
}
