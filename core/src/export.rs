use crate::{InvertedIndex, Posting};
use anyhow::{bail, Context, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::io::{BufRead, Write};

const SEP: &str = " -> ";

/// One dictionary entry as handed to a [`PostingsSink`].
#[derive(Debug, Clone, Copy)]
pub struct TermPostings<'a> {
    pub term: &'a str,
    /// In original insertion order.
    pub postings: &'a [Posting],
}

impl TermPostings<'_> {
    pub fn document_frequency(&self) -> usize {
        self.postings.len()
    }
}

/// `<term> <df> -> (<doc>,<tf>) -> ...`
impl fmt::Display for TermPostings<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.term, self.document_frequency())?;
        for p in self.postings {
            write!(f, "{SEP}({},{})", p.doc_id, p.term_frequency)?;
        }
        Ok(())
    }
}

/// Consumer of the sorted dictionary view.
pub trait PostingsSink {
    fn write_term(&mut self, entry: TermPostings<'_>) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Feed every term of `index`, in ascending term order, to `sink`.
pub fn export_postings<S: PostingsSink + ?Sized>(index: &InvertedIndex, sink: &mut S) -> Result<()> {
    for (term, postings) in index.sorted_terms() {
        sink.write_term(TermPostings { term, postings })?;
    }
    sink.finish()
}

/// Writes one text line per term.
pub struct PostingsWriter<W: Write> {
    out: W,
}

impl<W: Write> PostingsWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> PostingsSink for PostingsWriter<W> {
    fn write_term(&mut self, entry: TermPostings<'_>) -> Result<()> {
        writeln!(self.out, "{entry}")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Render the whole postings dump as a string.
pub fn postings_to_string(index: &InvertedIndex) -> Result<String> {
    let mut writer = PostingsWriter::new(Vec::new());
    export_postings(index, &mut writer)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

/// Read a postings dump back into term -> postings.
pub fn parse_postings<R: BufRead>(reader: R) -> Result<BTreeMap<String, Vec<Posting>>> {
    let mut out = BTreeMap::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let lineno = i + 1;
        if line.trim().is_empty() {
            continue;
        }

        let (head, rest) = line
            .split_once(SEP)
            .with_context(|| format!("line {lineno}: missing postings"))?;
        let (term, df) = head
            .split_once(' ')
            .with_context(|| format!("line {lineno}: missing document frequency"))?;
        let df: usize = df
            .parse()
            .with_context(|| format!("line {lineno}: bad document frequency {df:?}"))?;

        let mut postings = Vec::with_capacity(df);
        for chunk in rest.split(SEP) {
            let inner = chunk
                .strip_prefix('(')
                .and_then(|c| c.strip_suffix(')'))
                .with_context(|| format!("line {lineno}: malformed posting {chunk:?}"))?;
            // doc ids may contain commas; the frequency never does
            let (doc_id, tf) = inner
                .rsplit_once(',')
                .with_context(|| format!("line {lineno}: malformed posting {chunk:?}"))?;
            let term_frequency: u32 = tf
                .parse()
                .with_context(|| format!("line {lineno}: bad term frequency {tf:?}"))?;
            postings.push(Posting { doc_id: doc_id.to_string(), term_frequency });
        }

        if postings.len() != df {
            bail!("line {lineno}: term {term:?} declares {df} postings but lists {}", postings.len());
        }
        if out.insert(term.to_string(), postings).is_some() {
            bail!("line {lineno}: duplicate term {term:?}");
        }
    }
    Ok(out)
}
