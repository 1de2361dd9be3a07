//! The file-system facade

use crate::{FsResult, FsSettings, StoreAclView};
use acl::{AccessEvaluator, AclAttributeView, FilePermissions, PermissionSet, Principal, Requester};
use blob_channel::{
    AttributeLookupMap, BlobChannel, ChannelContext, ChannelTransport, FileAttribute, OpenOptions,
};
use blob_store::{BlobPath, BlobStore, PathResolver, SlashPathResolver, StoreError};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Opens channels and answers permission questions for path-addressed objects
#[derive(Clone)]
pub struct BlobFileSystem {
    context: ChannelContext,
    resolver: Arc<dyn PathResolver>,
    owner: Principal,
}

impl BlobFileSystem {
    /// Creates a facade resolving `container/key` paths
    pub fn new(store: Arc<dyn BlobStore>, settings: FsSettings) -> Self {
        Self {
            context: ChannelContext::new(store).with_config(settings.channel),
            resolver: Arc::new(SlashPathResolver),
            owner: settings.owner,
        }
    }

    /// Replaces the path resolver
    pub fn with_resolver(mut self, resolver: Arc<dyn PathResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replaces the channel transport
    pub fn with_transport(mut self, transport: Arc<dyn ChannelTransport>) -> Self {
        self.context = self.context.with_transport(transport);
        self
    }

    /// The context handed to every channel
    pub fn context(&self) -> &ChannelContext {
        &self.context
    }

    /// The underlying store handle
    pub fn store(&self) -> &Arc<dyn BlobStore> {
        &self.context.store
    }

    /// Resolves a path to container + key
    pub fn resolve(&self, path: &str) -> FsResult<BlobPath> {
        Ok(self.resolver.resolve(path)?)
    }

    /// Opens a channel on `path`
    pub fn open(
        &self,
        path: &str,
        options: OpenOptions,
        attributes: Vec<FileAttribute>,
    ) -> FsResult<BlobChannel> {
        let path = self.resolve(path)?;
        let attributes = AttributeLookupMap::new(attributes)?;
        Ok(BlobChannel::open(
            self.context.clone(),
            path,
            options,
            attributes,
        )?)
    }

    /// Returns true if an object lives at `path`
    pub fn exists(&self, path: &str) -> FsResult<bool> {
        let path = self.resolve(path)?;
        Ok(self.store().exists(path.container(), path.key())?)
    }

    /// Removes the object at `path`; fails if there is none
    pub fn delete(&self, path: &str) -> FsResult<()> {
        let path = self.existing(path)?;
        self.store().remove(path.container(), path.key())?;
        tracing::debug!(%path, "deleted object");
        Ok(())
    }

    /// ACL view of the object at `path`
    pub fn acl_view(&self, path: &str) -> FsResult<StoreAclView> {
        let path = self.existing(path)?;
        Ok(StoreAclView::new(
            self.store().clone(),
            path,
            self.owner.clone(),
        ))
    }

    /// Evaluates a permission request against the object's ACL
    pub fn check_access(
        &self,
        path: &str,
        requester: Option<&Principal>,
        requester_groups: Option<&BTreeSet<Principal>>,
        permissions: &PermissionSet,
    ) -> FsResult<bool> {
        let attributes = self.acl_view(path)?.read_acl()?;
        Ok(AccessEvaluator::check_access(
            &attributes.entries,
            requester,
            requester_groups,
            permissions,
        ))
    }

    /// Caller-facing permission switches for the object at `path`
    pub fn permissions(
        &self,
        path: &str,
        requester: Requester,
    ) -> FsResult<FilePermissions<StoreAclView>> {
        Ok(FilePermissions::new(self.acl_view(path)?, requester))
    }

    fn existing(&self, path: &str) -> FsResult<BlobPath> {
        let path = self.resolve(path)?;
        if !self.store().exists(path.container(), path.key())? {
            return Err(StoreError::NotFound {
                container: path.container().to_string(),
                key: path.key().to_string(),
            }
            .into());
        }
        Ok(path)
    }
}
