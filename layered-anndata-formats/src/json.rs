//! Whole transcriptions as JSON documents.
//!
//! Everything the data model holds is kept: identifiers, metadata, scored
//! alternatives, vagueness of points, vocabularies, media and hierarchy.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;

use layered_anndata::{
    Annotation, CtrlVocab, Disjoint, HierarchyKind, Interval, Label, Localization, Location,
    Media, MetaObject, Metadata, Point, Scored, Tag, Tier, Transcription,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Capabilities, FormatError, FormatPlugin, FormatResult, TrsClass};

/// Reader and writer of `.json` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl FormatPlugin for JsonFormat {
    fn name(&self) -> &'static str {
        "json"
    }

    fn default_extension(&self) -> &'static str {
        "json"
    }

    fn trs_class(&self) -> TrsClass {
        TrsClass::Annot
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities {
            read: true,
            write: true,
            media: true,
            ctrl_vocab: true,
        }
    }

    fn detect(&self, path: &Path) -> bool {
        let Ok(mut file) = File::open(path) else {
            return false;
        };
        let mut head = [0u8; 512];
        let Ok(n) = file.read(&mut head) else {
            return false;
        };
        let text = String::from_utf8_lossy(&head[..n]);
        text.trim_start().starts_with('{') && text.contains("\"tiers\"")
    }

    fn read(&self, path: &Path) -> FormatResult<Transcription> {
        let reader = BufReader::new(File::open(path)?);
        let document: TranscriptionDoc =
            serde_json::from_reader(reader).map_err(|e| FormatError::parse(path, e))?;
        let trs = document.into_transcription(path)?;
        debug!(path = %path.display(), tiers = trs.len(), "parsed json");
        Ok(trs)
    }

    fn write(&self, trs: &Transcription, path: &Path) -> FormatResult<()> {
        let document = TranscriptionDoc::from(trs);
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, &document)
            .map_err(|e| FormatError::parse(path, e))?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

impl JsonFormat {
    /// Serialize to a JSON string.
    pub fn to_json(trs: &Transcription) -> FormatResult<String> {
        serde_json::to_string_pretty(&TranscriptionDoc::from(trs))
            .map_err(|e| FormatError::parse(Path::new(STRING_SOURCE), e))
    }

    /// Parse a JSON string.
    pub fn from_json(text: &str) -> FormatResult<Transcription> {
        let source = Path::new(STRING_SOURCE);
        let document: TranscriptionDoc =
            serde_json::from_str(text).map_err(|e| FormatError::parse(source, e))?;
        document.into_transcription(source)
    }
}

const STRING_SOURCE: &str = "<string>";

type MetaMap = BTreeMap<String, String>;

fn meta_map(metadata: &Metadata) -> MetaMap {
    metadata
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn restore_metadata(id: &str, entries: &MetaMap) -> FormatResult<Metadata> {
    let mut metadata = Metadata::with_id(id);
    for (key, value) in entries {
        metadata.set(key.as_str(), value.as_str())?;
    }
    Ok(metadata)
}

#[derive(Debug, Serialize, Deserialize)]
struct TranscriptionDoc {
    id: String,
    name: String,
    #[serde(default)]
    metadata: MetaMap,
    #[serde(default)]
    media: Vec<MediaDoc>,
    #[serde(default)]
    ctrl_vocabs: Vec<CtrlVocabDoc>,
    tiers: Vec<TierDoc>,
    #[serde(default)]
    hierarchy: Vec<LinkDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct MediaDoc {
    id: String,
    url: String,
    mime: String,
    #[serde(default)]
    metadata: MetaMap,
}

#[derive(Debug, Serialize, Deserialize)]
struct CtrlVocabDoc {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    metadata: MetaMap,
    entries: Vec<VocabEntryDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct VocabEntryDoc {
    tag: TagDoc,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct TierDoc {
    id: String,
    name: String,
    #[serde(default)]
    metadata: MetaMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    media: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ctrl_vocab: Option<String>,
    annotations: Vec<AnnotationDoc>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AnnotationDoc {
    id: String,
    #[serde(default)]
    metadata: MetaMap,
    location: Vec<ScoredDoc<LocalizationDoc>>,
    #[serde(default)]
    labels: Vec<Vec<ScoredDoc<TagDoc>>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ScoredDoc<T> {
    value: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    score: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PointDoc {
    midpoint: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    radius: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum LocalizationDoc {
    Point { point: PointDoc },
    Interval { begin: PointDoc, end: PointDoc },
    Disjoint { intervals: Vec<(PointDoc, PointDoc)> },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
enum TagDoc {
    Empty,
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

#[derive(Debug, Serialize, Deserialize)]
struct LinkDoc {
    kind: HierarchyKind,
    parent: String,
    child: String,
}

// Model to documents

impl From<&Transcription> for TranscriptionDoc {
    fn from(trs: &Transcription) -> Self {
        Self {
            id: trs.id().to_string(),
            name: trs.name().to_string(),
            metadata: meta_map(trs.metadata()),
            media: trs.media().iter().map(|m| MediaDoc::from(m.as_ref())).collect(),
            ctrl_vocabs: trs
                .ctrl_vocabs()
                .iter()
                .map(|v| CtrlVocabDoc::from(v.as_ref()))
                .collect(),
            tiers: trs.iter().map(TierDoc::from).collect(),
            hierarchy: trs
                .hierarchy()
                .iter()
                .map(|(kind, parent, child)| LinkDoc {
                    kind,
                    parent: parent.to_string(),
                    child: child.to_string(),
                })
                .collect(),
        }
    }
}

impl From<&Media> for MediaDoc {
    fn from(media: &Media) -> Self {
        Self {
            id: media.id().to_string(),
            url: media.url().to_string(),
            mime: media.mime().to_string(),
            metadata: meta_map(media.metadata()),
        }
    }
}

impl From<&CtrlVocab> for CtrlVocabDoc {
    fn from(vocab: &CtrlVocab) -> Self {
        Self {
            id: vocab.id().to_string(),
            name: vocab.name().to_string(),
            description: vocab.description().to_string(),
            metadata: meta_map(vocab.metadata()),
            entries: vocab
                .iter()
                .map(|(tag, description)| VocabEntryDoc {
                    tag: TagDoc::from(tag),
                    description: description.to_string(),
                })
                .collect(),
        }
    }
}

impl From<&Tier> for TierDoc {
    fn from(tier: &Tier) -> Self {
        Self {
            id: tier.id().to_string(),
            name: tier.name().to_string(),
            metadata: meta_map(tier.metadata()),
            media: tier.media().map(|m| m.id().to_string()),
            ctrl_vocab: tier.ctrl_vocab().map(|v| v.id().to_string()),
            annotations: tier.iter().map(AnnotationDoc::from).collect(),
        }
    }
}

impl From<&Annotation> for AnnotationDoc {
    fn from(annotation: &Annotation) -> Self {
        Self {
            id: annotation.id().to_string(),
            metadata: meta_map(annotation.metadata()),
            location: annotation
                .location()
                .alternatives()
                .iter()
                .map(|alt| ScoredDoc {
                    value: LocalizationDoc::from(&alt.value),
                    score: alt.score,
                })
                .collect(),
            labels: annotation
                .labels()
                .iter()
                .map(|label| {
                    label
                        .alternatives()
                        .iter()
                        .map(|alt| ScoredDoc {
                            value: TagDoc::from(&alt.value),
                            score: alt.score,
                        })
                        .collect()
                })
                .collect(),
        }
    }
}

impl From<Point> for PointDoc {
    fn from(point: Point) -> Self {
        Self {
            midpoint: point.midpoint(),
            radius: point.radius(),
        }
    }
}

impl From<&Localization> for LocalizationDoc {
    fn from(localization: &Localization) -> Self {
        match localization {
            Localization::Point(p) => LocalizationDoc::Point { point: (*p).into() },
            Localization::Interval(i) => LocalizationDoc::Interval {
                begin: i.begin().into(),
                end: i.end().into(),
            },
            Localization::Disjoint(d) => LocalizationDoc::Disjoint {
                intervals: d
                    .intervals()
                    .iter()
                    .map(|i| (i.begin().into(), i.end().into()))
                    .collect(),
            },
        }
    }
}

impl From<&Tag> for TagDoc {
    fn from(tag: &Tag) -> Self {
        match tag {
            Tag::Empty => TagDoc::Empty,
            Tag::Str(s) => TagDoc::Str(s.clone()),
            Tag::Int(i) => TagDoc::Int(*i),
            Tag::Float(f) => TagDoc::Float(*f),
            Tag::Bool(b) => TagDoc::Bool(*b),
        }
    }
}

// Documents to model

impl From<PointDoc> for Point {
    fn from(doc: PointDoc) -> Self {
        match doc.radius {
            Some(radius) => Point::with_radius(doc.midpoint, radius),
            None => Point::new(doc.midpoint),
        }
    }
}

impl From<TagDoc> for Tag {
    fn from(doc: TagDoc) -> Self {
        match doc {
            TagDoc::Empty => Tag::Empty,
            TagDoc::Str(s) => Tag::Str(s),
            TagDoc::Int(i) => Tag::Int(i),
            TagDoc::Float(f) => Tag::Float(f),
            TagDoc::Bool(b) => Tag::Bool(b),
        }
    }
}

impl LocalizationDoc {
    fn into_localization(self) -> FormatResult<Localization> {
        Ok(match self {
            LocalizationDoc::Point { point } => Localization::Point(point.into()),
            LocalizationDoc::Interval { begin, end } => {
                Localization::Interval(Interval::new(begin.into(), end.into())?)
            }
            LocalizationDoc::Disjoint { intervals } => {
                let intervals = intervals
                    .into_iter()
                    .map(|(b, e)| Interval::new(b.into(), e.into()))
                    .collect::<Result<Vec<_>, _>>()?;
                Localization::Disjoint(Disjoint::new(intervals)?)
            }
        })
    }
}

impl AnnotationDoc {
    fn into_annotation(self) -> FormatResult<Annotation> {
        let alternatives = self
            .location
            .into_iter()
            .map(|alt| Ok(Scored::new(alt.value.into_localization()?, alt.score)))
            .collect::<FormatResult<Vec<_>>>()?;
        let location = Location::with_alternatives(alternatives)?;
        let labels = self
            .labels
            .into_iter()
            .map(|alts| {
                Label::with_alternatives(
                    alts.into_iter()
                        .map(|alt| Scored::new(Tag::from(alt.value), alt.score))
                        .collect(),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        let metadata = restore_metadata(&self.id, &self.metadata)?;
        Ok(Annotation::with_labels(location, labels).with_metadata(metadata))
    }
}

impl TranscriptionDoc {
    fn into_transcription(self, source: &Path) -> FormatResult<Transcription> {
        let mut trs =
            Transcription::with_metadata(self.name, restore_metadata(&self.id, &self.metadata)?);

        for doc in self.media {
            let media = Media::new(doc.url, Some(doc.mime.as_str()))
                .with_metadata(restore_metadata(&doc.id, &doc.metadata)?);
            trs.add_media(Arc::new(media))?;
        }
        for doc in self.ctrl_vocabs {
            let mut vocab = CtrlVocab::new(doc.name)
                .with_description(doc.description)
                .with_metadata(restore_metadata(&doc.id, &doc.metadata)?);
            for entry in doc.entries {
                vocab.add(entry.tag.into(), &entry.description)?;
            }
            trs.add_ctrl_vocab(Arc::new(vocab))?;
        }

        for doc in self.tiers {
            let mut tier = Tier::with_metadata(doc.name, restore_metadata(&doc.id, &doc.metadata)?);
            if let Some(id) = &doc.media {
                let media = trs.get_media_from_id(id).cloned().ok_or_else(|| {
                    FormatError::parse(source, format!("unknown media {:?}", id))
                })?;
                tier.set_media(Some(media));
            }
            if let Some(id) = &doc.ctrl_vocab {
                let vocab = trs
                    .ctrl_vocabs()
                    .iter()
                    .find(|v| v.id() == id)
                    .cloned()
                    .ok_or_else(|| FormatError::parse(source, format!("unknown vocabulary {:?}", id)))?;
                tier.set_ctrl_vocab(Some(vocab))?;
            }
            for annotation in doc.annotations {
                tier.add(annotation.into_annotation()?)?;
            }
            trs.append_tier(tier)?;
        }

        for link in self.hierarchy {
            let parent = tier_position(&trs, &link.parent, source)?;
            let child = tier_position(&trs, &link.child, source)?;
            trs.add_hierarchy_link(link.kind, parent, child)?;
        }
        Ok(trs)
    }
}

fn tier_position(trs: &Transcription, id: &str, source: &Path) -> FormatResult<usize> {
    trs.iter()
        .position(|t| t.id() == id)
        .ok_or_else(|| FormatError::parse(source, format!("unknown tier {:?}", id)))
}
