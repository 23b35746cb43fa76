use crate::config::Config;
use crate::display::interface::Display;
use crate::library::logger::interface::Logger;
use crate::lotto_picture::core::{init, transition, Effect, Model, Msg};
use crate::lotto_picture::render::Render;
use crate::lotto_picture::run_effect::RunEffect;
use crate::scorer::interface::Scorer;
use crate::scorer::session::ScorerSession;
use crate::storage::interface::Storage;
use std::error::Error;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

pub struct LottoPicture {
    logger: Arc<dyn Logger + Send + Sync>,
    scorer: Arc<dyn Scorer + Send + Sync>,
    sender: Sender<Msg>,
    receiver: Mutex<Receiver<Msg>>,
    model: Arc<Mutex<Model>>,
    render: Render,
    run_effect: RunEffect,
}

impl LottoPicture {
    pub fn new(
        config: Config,
        logger: Arc<dyn Logger + Send + Sync>,
        scorer: Arc<dyn Scorer + Send + Sync>,
        storage: Arc<dyn Storage + Send + Sync>,
        display: Arc<Mutex<dyn Display + Send + Sync>>,
    ) -> Self {
        let (sender, receiver) = channel();
        let logger = logger.with_namespace("app");
        let render = Render::new(display.clone(), config.logger_timezone);
        let run_effect = RunEffect::new(
            config,
            logger.clone(),
            scorer.clone(),
            storage,
            display,
            sender.clone(),
        );

        Self {
            logger,
            scorer,
            sender,
            receiver: Mutex::new(receiver),
            model: Arc::new(Mutex::new(Model::default())),
            render,
            run_effect,
        }
    }

    /// Channel into the run loop for user input.
    pub fn sender(&self) -> Sender<Msg> {
        self.sender.clone()
    }

    pub fn model(&self) -> Model {
        match self.model.lock() {
            Ok(model) => model.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Runs until a `Shutdown` message arrives.
    pub fn run(&self) -> Result<Model, Box<dyn Error + Send + Sync>> {
        self.run_until(|_| false)
    }

    /// Runs until `done` holds for the model or a `Shutdown` arrives. The
    /// scorer is released on every exit path.
    pub fn run_until(
        &self,
        done: impl Fn(&Model) -> bool,
    ) -> Result<Model, Box<dyn Error + Send + Sync>> {
        let _session = ScorerSession::new(self.scorer.clone(), self.logger.clone());
        let receiver = self
            .receiver
            .lock()
            .map_err(|_| "run loop already running".to_string())?;

        let (mut model, effects) = init();
        self.publish(&model);
        self.log_effects(&effects);
        self.run_effect.spawn(effects);

        while model.running && !done(&model) {
            let msg = receiver.recv()?;
            let _ = self
                .logger
                .info(&format!("msg: {}", msg.to_display_string()));

            let (next, effects) = transition(model, msg);
            model = next;

            let _ = self.logger.info(&format!("model: {}", model.summary()));
            self.publish(&model);
            self.log_effects(&effects);
            self.run_effect.spawn(effects);
        }

        let _ = self.logger.info("Run loop stopped");
        Ok(model)
    }

    fn publish(&self, model: &Model) {
        match self.model.lock() {
            Ok(mut shared) => *shared = model.clone(),
            Err(poisoned) => *poisoned.into_inner() = model.clone(),
        }

        if let Err(e) = self.render.render(model) {
            let _ = self.logger.error(&format!("Failed to render: {}", e));
        }
    }

    fn log_effects(&self, effects: &[Effect]) {
        if effects.is_empty() {
            return;
        }
        let names = effects
            .iter()
            .map(|effect| effect.to_display_string())
            .collect::<Vec<_>>();
        let _ = self
            .logger
            .info(&format!("effects: [{}]", names.join(", ")));
    }
}
