use cgmath::Vector3;
use floating_forms::{
    Config, Showcase, Variant,
    animation::FrameLoop,
    data_structures::{
        scene_graph::{ContainerNode, SceneNode},
        transform::Transform,
    },
    loader::AssetSource,
    scene::Scene,
};
use std::task::Poll;

use futures::{FutureExt, future::LocalBoxFuture};
use instant::Duration;

pub(crate) const WIDTH: u32 = 800;
pub(crate) const HEIGHT: u32 = 600;
pub(crate) const SEED: u64 = 7;
/// Roughly one frame at 60 Hz.
pub(crate) const DT: Duration = Duration::from_millis(16);

/// A showcase with a fixed seed, loading from the default (failing) source.
pub(crate) fn showcase(variant: Variant) -> Showcase {
    Showcase::new(Config::new(variant).with_seed(SEED), WIDTH, HEIGHT)
}

/// Drives a [`Showcase`] with a [`FrameLoop`] and a fixed frame time.
pub(crate) struct Driver {
    pub(crate) showcase: Showcase,
    pub(crate) frame_loop: FrameLoop,
}

impl Driver {
    pub(crate) fn new(showcase: Showcase) -> Self {
        let mut frame_loop = FrameLoop::new();
        frame_loop.start();
        Self {
            showcase,
            frame_loop,
        }
    }

    pub(crate) fn of(variant: Variant) -> Self {
        Self::new(showcase(variant))
    }

    pub(crate) fn frames(&mut self, n: usize) {
        for _ in 0..n {
            if let Some(tick) = self.frame_loop.step(DT) {
                self.showcase.frame(&tick);
            }
        }
    }

    /// Runs frames until the model is installed.
    pub(crate) fn settle(&mut self) {
        for _ in 0..1000 {
            if !self.showcase.is_loading() {
                return;
            }
            self.frames(1);
        }
        panic!("the model never finished loading");
    }

    pub(crate) fn settled(variant: Variant) -> Self {
        let mut driver = Self::of(variant);
        driver.settle();
        driver
    }
}

pub(crate) fn model(scene: &Scene) -> &dyn SceneNode {
    scene.model().expect("a model is installed")
}

pub(crate) fn wireframe_flags(scene: &Scene) -> Vec<bool> {
    let mut flags = Vec::new();
    scene.traverse(&mut |node| {
        if let Some(mesh) = node.as_mesh() {
            flags.push(mesh.material.wireframe);
        }
    });
    flags
}

/// Transforms of the model and all of its descendants, in traversal order.
pub(crate) fn model_transforms(scene: &Scene) -> Vec<Transform> {
    let mut transforms = Vec::new();
    floating_forms::data_structures::scene_graph::traverse(model(scene), &mut |node| {
        transforms.push(node.transform().clone());
    });
    transforms
}

pub(crate) fn distance(a: Vector3<f32>, b: Vector3<f32>) -> f32 {
    use cgmath::InnerSpace;
    (a - b).magnitude()
}

/// Delivers a ready-made model right away.
pub(crate) struct ReadyAsset;

impl AssetSource for ReadyAsset {
    fn fetch(&mut self) -> LocalBoxFuture<'static, anyhow::Result<Box<dyn SceneNode>>> {
        async { Ok(Box::new(ContainerNode::new("asset")) as Box<dyn SceneNode>) }.boxed_local()
    }
}

/// Never finishes.
pub(crate) struct StalledAsset;

impl AssetSource for StalledAsset {
    fn fetch(&mut self) -> LocalBoxFuture<'static, anyhow::Result<Box<dyn SceneNode>>> {
        futures::future::pending().boxed_local()
    }
}

/// Finishes only after being polled `polls` times, like a request that
/// completes in the background between frames.
pub(crate) struct SlowAsset {
    pub(crate) polls: usize,
}

impl AssetSource for SlowAsset {
    fn fetch(&mut self) -> LocalBoxFuture<'static, anyhow::Result<Box<dyn SceneNode>>> {
        let mut remaining = self.polls;
        futures::future::poll_fn(move |cx| {
            remaining = remaining.saturating_sub(1);
            if remaining > 0 {
                cx.waker().wake_by_ref();
                Poll::Pending
            } else {
                Poll::Ready(Ok(Box::new(ContainerNode::new("slow-asset")) as Box<dyn SceneNode>))
            }
        })
        .boxed_local()
    }
}
