use pod_state::StateStore;

use crate::{
    feed::FeedSource,
    telegram::{CommandPoller, Notifier},
    PipelineRunner, Server, ServerConfig,
};

pub struct ServerBuilder<F = (), R = (), P = (), N = (), S = ()> {
    config: ServerConfig,
    feed: F,
    runner: R,
    poller: P,
    notifier: N,
    store: S,
}

impl ServerBuilder {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            feed: (),
            runner: (),
            poller: (),
            notifier: (),
            store: (),
        }
    }
}

impl<F, R, P, N, S> ServerBuilder<F, R, P, N, S> {
    pub fn feed_source<F2: FeedSource + Send + Sync + 'static>(
        self,
        feed: F2,
    ) -> ServerBuilder<F2, R, P, N, S> {
        ServerBuilder {
            config: self.config,
            feed,
            runner: self.runner,
            poller: self.poller,
            notifier: self.notifier,
            store: self.store,
        }
    }

    pub fn runner<R2: PipelineRunner + Send + Sync + 'static>(
        self,
        runner: R2,
    ) -> ServerBuilder<F, R2, P, N, S> {
        ServerBuilder {
            config: self.config,
            feed: self.feed,
            runner,
            poller: self.poller,
            notifier: self.notifier,
            store: self.store,
        }
    }

    pub fn poller<P2: CommandPoller + Send + Sync + 'static>(
        self,
        poller: P2,
    ) -> ServerBuilder<F, R, P2, N, S> {
        ServerBuilder {
            config: self.config,
            feed: self.feed,
            runner: self.runner,
            poller,
            notifier: self.notifier,
            store: self.store,
        }
    }

    pub fn notifier<N2: Notifier + Send + Sync + 'static>(
        self,
        notifier: N2,
    ) -> ServerBuilder<F, R, P, N2, S> {
        ServerBuilder {
            config: self.config,
            feed: self.feed,
            runner: self.runner,
            poller: self.poller,
            notifier,
            store: self.store,
        }
    }

    pub fn store<S2: StateStore + Send + Sync + 'static>(
        self,
        store: S2,
    ) -> ServerBuilder<F, R, P, N, S2> {
        ServerBuilder {
            config: self.config,
            feed: self.feed,
            runner: self.runner,
            poller: self.poller,
            notifier: self.notifier,
            store,
        }
    }
}

impl<F, R, P, N, S> ServerBuilder<F, R, P, N, S>
where
    F: FeedSource + Send + Sync + 'static,
    R: PipelineRunner + Send + Sync + 'static,
    P: CommandPoller + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
    S: StateStore + Send + Sync + 'static,
{
    pub fn build(self) -> Server<F, R, P, N, S> {
        Server {
            config: self.config,
            feed: self.feed,
            runner: self.runner,
            poller: self.poller,
            notifier: self.notifier,
            store: self.store,
            next_feed_check: None,
        }
    }
}
