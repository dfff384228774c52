//! A live projection of one host buffer.

use std::sync::{Arc, Weak};

use cloak_buffer::{BufferHandle, BufferSnapshot, EditListener};
use cloak_lexer::{ScriptTokenizer, Tokenizer};
use cloak_primitives::{CharIdx, CharRange, EditBatch, Rope};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::composite::{BodyHandle, CompositeDocument, CompositeEdit, SegmentKind};
use crate::config::ProjectionConfig;
use crate::elision::ElisionView;
use crate::error::Result;
use crate::footer::FOOTER;
use crate::header::HeaderTemplate;
use crate::lookup::{AuxiliaryLookup, NoAuxiliary};
use crate::sync::{ChangeSynchronizer, PendingScan, SyncLatch, SyncOutcome, SyncState};

/// Receives composite changes.
///
/// Called after the projection's internal lock is released, so the listener
/// may read the projection and edit the underlying buffer.
pub trait CompositeListener: Send + Sync {
	/// `edits` are in composite coordinates, body edits first, then at most
	/// one header replacement.
	fn on_composite_changed(&self, projection: &Projection, edits: &[CompositeEdit]);
}

/// Composite view of a host buffer with a header kept in sync with the
/// body's leading trivia.
///
/// Cloning yields another handle to the same projection. The buffer only
/// holds the projection weakly; dropping the last handle detaches it.
#[derive(Clone)]
pub struct Projection {
	shared: Arc<Shared>,
}

struct Shared {
	this: Weak<Shared>,
	buffer: BufferHandle,
	latch: SyncLatch,
	core: Mutex<Core>,
	listeners: Mutex<Vec<Weak<dyn CompositeListener>>>,
}

struct Core {
	sync: ChangeSynchronizer,
	composite: CompositeDocument,
	elision: ElisionView,
}

impl Projection {
	/// Attaches a projection to `buffer` using `config` for the header.
	pub fn attach(
		buffer: BufferHandle,
		lookup: impl AuxiliaryLookup + 'static,
		config: &ProjectionConfig,
	) -> Result<Self> {
		config.validate()?;
		Ok(Self::builder(buffer).lookup(lookup).config(config).attach())
	}

	/// Starts configuring a projection of `buffer`.
	pub fn builder(buffer: BufferHandle) -> ProjectionBuilder {
		ProjectionBuilder {
			buffer,
			tokenizer: Box::new(ScriptTokenizer),
			lookup: Box::new(NoAuxiliary),
			template: HeaderTemplate::default(),
		}
	}

	pub fn buffer(&self) -> &BufferHandle {
		&self.shared.buffer
	}

	/// Runs `f` with a consistent view of the composite and its window.
	pub fn read<R>(&self, f: impl FnOnce(&CompositeDocument, &ElisionView) -> R) -> R {
		let core = self.shared.core.lock();
		f(&core.composite, &core.elision)
	}

	/// Full composite text.
	pub fn text(&self) -> String {
		self.read(|composite, _| composite.text())
	}

	pub fn to_rope(&self) -> Rope {
		self.read(|composite, _| composite.to_rope())
	}

	pub fn len_chars(&self) -> usize {
		self.read(|composite, _| composite.len_chars())
	}

	pub fn header(&self) -> String {
		self.read(|composite, _| composite.header().to_string())
	}

	pub fn footer(&self) -> String {
		self.read(|composite, _| composite.footer().to_string())
	}

	pub fn segment(&self, kind: SegmentKind) -> CharRange {
		self.read(|composite, _| composite.segment(kind))
	}

	/// Number of header replacements so far.
	pub fn version(&self) -> u64 {
		self.read(|composite, _| composite.version())
	}

	/// Char offset in the body where the leading trivia ends.
	pub fn boundary(&self) -> CharIdx {
		self.shared.core.lock().sync.boundary()
	}

	pub fn visible_range(&self) -> CharRange {
		self.read(|composite, view| view.visible_range(composite))
	}

	/// The body text as seen through the view.
	pub fn visible_text(&self) -> String {
		self.read(|composite, view| view.visible_text(composite))
	}

	pub fn to_composite(&self, pos: CharIdx) -> CharIdx {
		self.read(|_, view| view.to_composite(pos))
	}

	pub fn to_visible(&self, pos: CharIdx) -> Option<CharIdx> {
		self.read(|composite, view| view.to_visible(composite, pos))
	}

	/// Returns true if `range` (composite coordinates) lies inside the body.
	pub fn is_editable(&self, range: &CharRange) -> bool {
		self.read(|composite, view| view.is_editable(composite, range))
	}

	pub fn state(&self) -> SyncState {
		self.shared.latch.state()
	}

	/// Re-scans the body and re-synthesizes the header outside of any edit.
	pub fn refresh(&self) {
		self.shared.process(PendingScan::Refresh);
	}

	/// Registers a listener for composite changes. Held weakly.
	pub fn subscribe(&self, listener: Weak<dyn CompositeListener>) {
		self.shared.listeners.lock().push(listener);
	}
}

impl std::fmt::Debug for Projection {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Projection")
			.field("buffer", &self.shared.buffer)
			.field("state", &self.state())
			.finish_non_exhaustive()
	}
}

/// Configures and attaches a [`Projection`].
pub struct ProjectionBuilder {
	buffer: BufferHandle,
	tokenizer: Box<dyn Tokenizer>,
	lookup: Box<dyn AuxiliaryLookup>,
	template: HeaderTemplate,
}

impl ProjectionBuilder {
	/// Replaces the default [`ScriptTokenizer`].
	pub fn tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
		self.tokenizer = Box::new(tokenizer);
		self
	}

	/// Sets the auxiliary reference lookup. Defaults to [`NoAuxiliary`].
	pub fn lookup(mut self, lookup: impl AuxiliaryLookup + 'static) -> Self {
		self.lookup = Box::new(lookup);
		self
	}

	pub fn template(mut self, template: HeaderTemplate) -> Self {
		self.template = template;
		self
	}

	pub fn config(self, config: &ProjectionConfig) -> Self {
		self.template(config.template())
	}

	/// Scans the buffer, builds the composite and subscribes to edits.
	pub fn attach(self) -> Projection {
		let Self {
			buffer,
			tokenizer,
			lookup,
			template,
		} = self;

		let body = BodyHandle::track_all(buffer.clone());
		let sync = ChangeSynchronizer::new(tokenizer, lookup, template, &buffer.snapshot());
		let composite = CompositeDocument::new(sync.header().to_string(), body, FOOTER);
		let elision = ElisionView::new(composite.header_len());
		debug!(
			buffer = ?buffer.id(),
			boundary = sync.boundary(),
			header_len = composite.header_len(),
			"Attached projection"
		);

		let shared = Arc::new_cyclic(|this| Shared {
			this: this.clone(),
			buffer: buffer.clone(),
			latch: SyncLatch::new(),
			core: Mutex::new(Core {
				sync,
				composite,
				elision,
			}),
			listeners: Mutex::new(Vec::new()),
		});
		let listener: Weak<dyn EditListener> = Arc::downgrade(&shared) as Weak<dyn EditListener>;
		buffer.subscribe(listener);
		Projection { shared }
	}
}

impl Shared {
	/// Queues `scan` and, unless another pass is running, drains the queue,
	/// notifying consumers after each round.
	///
	/// Work is always evaluated against the live buffer: notifications can
	/// arrive late or out of order when another listener edits the buffer
	/// from its own callback.
	fn process(&self, scan: PendingScan) {
		let Some(mut guard) = self.latch.enter(scan) else {
			warn!("Change arrived during scan, deferring");
			return;
		};

		while let Some(pending) = guard.next_batch() {
			let edits: Vec<_> = {
				let mut core = self.core.lock();
				let snapshot = self.buffer.snapshot();
				pending
					.iter()
					.flat_map(|scan| core.handle(&snapshot, scan))
					.collect()
			};
			if !edits.is_empty() {
				self.notify(&edits);
			}
		}
	}

	fn notify(&self, edits: &[CompositeEdit]) {
		let Some(shared) = self.this.upgrade() else {
			return;
		};
		let projection = Projection { shared };
		let listeners: Vec<_> = {
			let mut listeners = self.listeners.lock();
			listeners.retain(|weak| weak.strong_count() > 0);
			listeners.iter().filter_map(Weak::upgrade).collect()
		};
		for listener in listeners {
			listener.on_composite_changed(&projection, edits);
		}
	}
}

impl EditListener for Shared {
	fn on_edits(&self, _snapshot: &BufferSnapshot, batch: &EditBatch) {
		self.process(PendingScan::Edits(batch.clone()));
	}

	fn on_path_changed(&self, _snapshot: &BufferSnapshot) {
		self.process(PendingScan::Refresh);
	}
}

impl Core {
	/// Applies one unit of work and returns the resulting composite edits.
	///
	/// Body edits are reported against the header in place when they
	/// happened; a header replacement, if any, comes last.
	fn handle(&mut self, snapshot: &BufferSnapshot, scan: &PendingScan) -> Vec<CompositeEdit> {
		let mut edits = Vec::new();
		let outcome = match scan {
			PendingScan::Edits(batch) => {
				edits.extend(batch.iter().map(|edit| self.composite.map_body_edit(edit)));
				self.sync.on_edits(snapshot, batch)
			}
			PendingScan::Refresh => self.sync.rescan(snapshot),
		};

		if let SyncOutcome::Replaced(header) = outcome {
			let edit = self.composite.replace_header(header);
			self.elision.recompute(self.composite.header_len());
			debug!(
				old_len = edit.old_len,
				new_len = edit.new_len,
				version = self.composite.version(),
				"Replaced header"
			);
			edits.push(edit);
		}
		edits
	}
}
